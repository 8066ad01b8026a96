//! Bencode codec for the `hive-tracker`.
//!
//! Bencode is the canonical serialization format of the `BitTorrent`
//! protocol, described in
//! [BEP 3](https://www.bittorrent.org/beps/bep_0003.html). The tracker frames
//! every announce response with it.
//!
//! The encoder is deterministic: dictionary keys are kept in ascending
//! lexicographic byte order, so encoding the same logical dictionary twice
//! yields byte-identical output. The decoder is strict and is mostly consumed
//! by tests and tooling; it rejects malformed length prefixes, non-canonical
//! integers (`i-0e`, `i03e`), truncated payloads and unterminated containers
//! with a distinct error kind each.
//!
//! Values are built with the [`ben_int!`], [`ben_bytes!`], [`ben_list!`] and
//! [`ben_map!`] macros:
//!
//! ```rust
//! use hive_tracker_bencode::{ben_bytes, ben_int, ben_map};
//!
//! let response = ben_map! {
//!     "complete" => ben_int!(1),
//!     "incomplete" => ben_int!(2),
//!     "peers" => ben_bytes!("")
//! };
//!
//! assert_eq!(response.encode(), b"d8:completei1e10:incompletei2e5:peers0:e");
//! ```
use std::collections::BTreeMap;

use thiserror::Error;

pub mod decoder;

/// A bencode value: one of the four types of the format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bencode {
    /// `i<signed-decimal>e`
    Int(i64),
    /// `<len>:<bytes>`. Byte strings are not required to be valid UTF-8.
    Bytes(Vec<u8>),
    /// `l<encoded-element>…e`
    List(Vec<Bencode>),
    /// `d<key-string><value>…e`, keys in ascending lexicographic byte order.
    Dict(BTreeMap<Vec<u8>, Bencode>),
}

/// Errors returned by the [`decoder`].
#[derive(PartialEq, Eq, Debug, Error)]
pub enum Error {
    /// The input ended before the value was complete.
    #[error("truncated bencode value at byte {pos}")]
    Truncated { pos: usize },
    /// A byte string length prefix is empty, non-decimal or has leading zeros.
    #[error("malformed byte string length prefix at byte {pos}")]
    InvalidLengthPrefix { pos: usize },
    /// An integer is empty, non-canonical (`-0`, leading zeros) or overflows.
    #[error("malformed integer at byte {pos}")]
    InvalidInteger { pos: usize },
    /// A list or dictionary was opened but never closed with `e`.
    #[error("unterminated container opened at byte {pos}")]
    UnterminatedContainer { pos: usize },
    /// A dictionary key is not a byte string, duplicated or out of order.
    #[error("invalid dictionary key at byte {pos}")]
    InvalidDictKey { pos: usize },
    /// The first byte of a value is none of `i`, `l`, `d` or a digit.
    #[error("unexpected byte at {pos}")]
    UnexpectedByte { pos: usize },
    /// The input holds extra bytes after the top level value.
    #[error("trailing data after the value, at byte {pos}")]
    TrailingData { pos: usize },
}

impl Bencode {
    /// Decodes one complete bencode value, consuming the whole input.
    ///
    /// # Errors
    ///
    /// Will return an [`Error`] variant naming the malformation and the byte
    /// offset it was found at.
    pub fn decode(bytes: &[u8]) -> Result<Bencode, Error> {
        decoder::decode(bytes)
    }

    /// Encodes the value into its canonical byte form.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut output = Vec::new();
        self.write(&mut output);
        output
    }

    fn write(&self, output: &mut Vec<u8>) {
        match self {
            Bencode::Int(value) => {
                output.push(b'i');
                output.extend_from_slice(value.to_string().as_bytes());
                output.push(b'e');
            }
            Bencode::Bytes(bytes) => {
                output.extend_from_slice(bytes.len().to_string().as_bytes());
                output.push(b':');
                output.extend_from_slice(bytes);
            }
            Bencode::List(items) => {
                output.push(b'l');
                for item in items {
                    item.write(output);
                }
                output.push(b'e');
            }
            Bencode::Dict(entries) => {
                // BTreeMap iteration order is the canonical key order.
                output.push(b'd');
                for (key, value) in entries {
                    output.extend_from_slice(key.len().to_string().as_bytes());
                    output.push(b':');
                    output.extend_from_slice(key);
                    value.write(output);
                }
                output.push(b'e');
            }
        }
    }

    /// Returns the value under `key` if `self` is a dictionary.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&Bencode> {
        match self {
            Bencode::Dict(entries) => entries.get(key),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Bencode::Int(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Bencode::Bytes(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Bencode]> {
        match self {
            Bencode::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_dict(&self) -> Option<&BTreeMap<Vec<u8>, Bencode>> {
        match self {
            Bencode::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Mutable access to the items if `self` is a list.
    pub fn list_mut(&mut self) -> Option<&mut Vec<Bencode>> {
        match self {
            Bencode::List(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable access to the entries if `self` is a dictionary.
    pub fn dict_mut(&mut self) -> Option<&mut BTreeMap<Vec<u8>, Bencode>> {
        match self {
            Bencode::Dict(entries) => Some(entries),
            _ => None,
        }
    }
}

/// Builds a [`Bencode::Int`].
#[macro_export]
macro_rules! ben_int {
    ($value:expr) => {
        $crate::Bencode::Int($value)
    };
}

/// Builds a [`Bencode::Bytes`] from anything convertible into a `Vec<u8>`
/// (`&str`, `String`, `&[u8]`, `Vec<u8>`, byte arrays).
#[macro_export]
macro_rules! ben_bytes {
    ($value:expr) => {
        $crate::Bencode::Bytes(::std::convert::Into::<::std::vec::Vec<u8>>::into($value))
    };
}

/// Builds a [`Bencode::List`] from already-built values.
#[macro_export]
macro_rules! ben_list {
    ($($value:expr),* $(,)?) => {
        $crate::Bencode::List(::std::vec![$($value),*])
    };
}

/// Builds a [`Bencode::Dict`]. Keys are sorted on insertion; insertion order
/// in the source does not matter.
#[macro_export]
macro_rules! ben_map {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut entries = ::std::collections::BTreeMap::new();
        $(
            entries.insert(::std::convert::Into::<::std::vec::Vec<u8>>::into($key), $value);
        )*
        $crate::Bencode::Dict(entries)
    }};
}

#[cfg(test)]
mod tests {
    use crate::Bencode;

    #[test]
    fn it_should_encode_the_four_types() {
        assert_eq!(ben_int!(42).encode(), b"i42e");
        assert_eq!(ben_int!(-42).encode(), b"i-42e");
        assert_eq!(ben_int!(0).encode(), b"i0e");
        assert_eq!(ben_bytes!("spam").encode(), b"4:spam");
        assert_eq!(ben_bytes!("").encode(), b"0:");
        assert_eq!(ben_list!(ben_bytes!("spam"), ben_bytes!("eggs")).encode(), b"l4:spam4:eggse");
        assert_eq!(
            ben_map! {"cow" => ben_bytes!("moo"), "spam" => ben_bytes!("eggs")}.encode(),
            b"d3:cow3:moo4:spam4:eggse"
        );
    }

    #[test]
    fn it_should_encode_non_utf8_byte_strings() {
        let value = ben_bytes!(vec![0xc6, 0x33, 0x64, 0x07, 0x1a, 0xe1]);

        assert_eq!(value.encode(), [b'6', b':', 0xc6, 0x33, 0x64, 0x07, 0x1a, 0xe1]);
    }

    #[test]
    fn it_should_encode_dictionaries_deterministically_regardless_of_insertion_order() {
        let first = ben_map! {
            "complete" => ben_int!(1),
            "peers" => ben_bytes!(""),
            "incomplete" => ben_int!(2)
        };
        let second = ben_map! {
            "peers" => ben_bytes!(""),
            "incomplete" => ben_int!(2),
            "complete" => ben_int!(1)
        };

        assert_eq!(first.encode(), second.encode());
        assert_eq!(first.encode(), b"d8:completei1e10:incompletei2e5:peers0:e");
    }

    #[test]
    fn it_should_round_trip_every_supported_value() {
        let values = [
            ben_int!(0),
            ben_int!(-7),
            ben_bytes!("announce"),
            ben_list!(ben_int!(1), ben_bytes!("two"), ben_list!()),
            ben_map! {
                "interval" => ben_int!(1800),
                "peers" => ben_bytes!(vec![0xff, 0x00]),
                "nested" => ben_map! {"a" => ben_int!(1)}
            },
        ];

        for value in values {
            assert_eq!(Bencode::decode(&value.encode()).unwrap(), value);
        }
    }
}
