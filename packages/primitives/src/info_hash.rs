use std::panic::Location;

use thiserror::Error;

/// `BitTorrent` Info Hash v1: the 20-byte SHA-1 identifier of a torrent's
/// info dictionary.
///
/// Internally the tracker always renders it as 40 lowercase hex characters.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord, Default)]
pub struct InfoHash([u8; INFO_HASH_BYTES_LEN]);

pub const INFO_HASH_BYTES_LEN: usize = 20;

impl InfoHash {
    /// Returns the `InfoHash` internal byte array.
    #[must_use]
    pub fn bytes(&self) -> [u8; INFO_HASH_BYTES_LEN] {
        self.0
    }

    /// Returns the `InfoHash` as a 40-character lowercase hex string.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for InfoHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut chars = [0u8; 2 * INFO_HASH_BYTES_LEN];
        binascii::bin2hex(&self.0, &mut chars).expect("it should fit in the output buffer");
        write!(f, "{}", std::str::from_utf8(&chars).unwrap())
    }
}

impl std::str::FromStr for InfoHash {
    type Err = binascii::ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 * INFO_HASH_BYTES_LEN {
            return Err(binascii::ConvertError::InvalidInputLength);
        }
        let mut i = Self::default();
        binascii::hex2bin(s.as_bytes(), &mut i.0)?;
        Ok(i)
    }
}

impl From<[u8; INFO_HASH_BYTES_LEN]> for InfoHash {
    fn from(bytes: [u8; INFO_HASH_BYTES_LEN]) -> Self {
        Self(bytes)
    }
}

/// Errors that can occur when converting from a `Vec<u8>` to an `InfoHash`.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Not enough bytes for infohash. An infohash is 20 bytes.
    #[error("not enough bytes for infohash: {message} {location}")]
    NotEnoughBytes {
        location: &'static Location<'static>,
        message: String,
    },
    /// Too many bytes for infohash. An infohash is 20 bytes.
    #[error("too many bytes for infohash: {message} {location}")]
    TooManyBytes {
        location: &'static Location<'static>,
        message: String,
    },
}

impl TryFrom<Vec<u8>> for InfoHash {
    type Error = ConversionError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.len() < INFO_HASH_BYTES_LEN {
            return Err(ConversionError::NotEnoughBytes {
                location: Location::caller(),
                message: format! {"got {} bytes, expected {}", bytes.len(), INFO_HASH_BYTES_LEN},
            });
        }
        if bytes.len() > INFO_HASH_BYTES_LEN {
            return Err(ConversionError::TooManyBytes {
                location: Location::caller(),
                message: format! {"got {} bytes, expected {}", bytes.len(), INFO_HASH_BYTES_LEN},
            });
        }
        let mut data = [0u8; INFO_HASH_BYTES_LEN];
        data.clone_from_slice(&bytes);
        Ok(Self(data))
    }
}

impl serde::ser::Serialize for InfoHash {
    fn serialize<S: serde::ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> serde::de::Deserialize<'de> for InfoHash {
    fn deserialize<D: serde::de::Deserializer<'de>>(des: D) -> Result<Self, D::Error> {
        des.deserialize_str(InfoHashVisitor)
    }
}

struct InfoHashVisitor;

impl serde::de::Visitor<'_> for InfoHashVisitor {
    type Value = InfoHash;

    fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "a 40 character long hash")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse::<InfoHash>().map_err(|_| {
            serde::de::Error::invalid_value(serde::de::Unexpected::Str(v), &"a 40 character long hexadecimal string")
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::InfoHash;

    #[test]
    fn it_should_be_parsed_from_a_40_character_hex_string() {
        let info_hash = InfoHash::from_str("3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0").unwrap();

        assert_eq!(
            info_hash.bytes(),
            [
                0x3b, 0x24, 0x55, 0x04, 0xcf, 0x5f, 0x11, 0xbb, 0xdb, 0xe1, 0x20, 0x1c, 0xea, 0x6a, 0x6b, 0xf4, 0x5a, 0xee,
                0x1b, 0xc0
            ]
        );
    }

    #[test]
    fn it_should_be_displayed_as_lowercase_hex_even_when_parsed_from_uppercase() {
        let info_hash = InfoHash::from_str("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF").unwrap();

        assert_eq!(info_hash.to_string(), "ffffffffffffffffffffffffffffffffffffffff");
    }

    #[test]
    fn it_should_fail_parsing_a_string_that_is_not_40_characters_long() {
        assert!(InfoHash::from_str("3b245504").is_err());
    }

    #[test]
    fn it_should_fail_parsing_a_string_with_non_hex_characters() {
        assert!(InfoHash::from_str("ZZ245504cf5f11bbdbe1201cea6a6bf45aee1bc0").is_err());
    }

    #[test]
    fn it_should_be_converted_from_a_20_byte_vector() {
        let info_hash = InfoHash::try_from([255u8; 20].to_vec()).unwrap();

        assert_eq!(info_hash, InfoHash::from_str("ffffffffffffffffffffffffffffffffffffffff").unwrap());
    }

    #[test]
    fn it_should_fail_converting_from_a_vector_with_the_wrong_length() {
        assert!(InfoHash::try_from([255u8; 19].to_vec()).is_err());
        assert!(InfoHash::try_from([255u8; 21].to_vec()).is_err());
    }

    #[test]
    fn it_should_be_serialized_as_a_hex_string() {
        let info_hash = InfoHash::from_str("3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0").unwrap();

        assert_eq!(
            serde_json::to_string(&info_hash).unwrap(),
            "\"3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0\""
        );
    }
}
