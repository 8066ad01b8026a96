//! Compact peer wire format.
//!
//! _"To reduce the size of tracker responses and to reduce memory and
//! computational requirements in trackers, trackers may return peers as a
//! packed string rather than as a bencoded list."_
//!
//! An IPv4 endpoint packs into 6 bytes (4-byte IP in network order plus
//! 2-byte port big-endian) and an IPv6 endpoint into 18 bytes (16 + 2). The
//! `peers` and `peers6` response fields are always separate; a packed blob
//! never mixes address families.
//!
//! Refer to the official BEPs for more information:
//!
//! - [BEP 23: Tracker Returns Compact Peer Lists](https://www.bittorrent.org/beps/bep_0023.html)
//! - [BEP 07: IPv6 Tracker Extension](https://www.bittorrent.org/beps/bep_0007.html)
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::panic::Location;

use thiserror::Error;

use crate::peer::Endpoint;
use crate::IPVersion;

/// Length in bytes of one packed IPv4 endpoint.
pub const COMPACT_V4_LEN: usize = 6;
/// Length in bytes of one packed IPv6 endpoint.
pub const COMPACT_V6_LEN: usize = 18;

/// Errors produced while packing or unpacking compact peer blobs.
#[derive(Error, Debug)]
pub enum Error {
    /// The endpoint family does not match the requested atom size.
    #[error("endpoint {endpoint} does not belong to the {expected:?} family in {location}")]
    MixedAddressFamilies {
        endpoint: Endpoint,
        expected: IPVersion,
        location: &'static Location<'static>,
    },
    /// The blob length is not a multiple of the atom size.
    #[error("compact peers blob length {len} is not a multiple of {atom_len} in {location}")]
    InvalidBlobLength {
        len: usize,
        atom_len: usize,
        location: &'static Location<'static>,
    },
}

/// Packs one IPv4 endpoint into its 6-byte wire form.
#[must_use]
pub fn encode_v4(ip: Ipv4Addr, port: u16) -> [u8; COMPACT_V4_LEN] {
    let mut bytes = [0u8; COMPACT_V4_LEN];
    bytes[..4].copy_from_slice(&u32::from(ip).to_be_bytes());
    bytes[4..].copy_from_slice(&port.to_be_bytes());
    bytes
}

/// Packs one IPv6 endpoint into its 18-byte wire form.
#[must_use]
pub fn encode_v6(ip: Ipv6Addr, port: u16) -> [u8; COMPACT_V6_LEN] {
    let mut bytes = [0u8; COMPACT_V6_LEN];
    bytes[..16].copy_from_slice(&u128::from(ip).to_be_bytes());
    bytes[16..].copy_from_slice(&port.to_be_bytes());
    bytes
}

/// Packs a list of endpoints of a single address family.
///
/// The caller is expected to have split the peer list by family already
/// (`peers` vs `peers6`).
///
/// # Errors
///
/// Will return [`Error::MixedAddressFamilies`] if any endpoint does not
/// belong to the requested family.
pub fn encode_many(endpoints: &[Endpoint], version: IPVersion) -> Result<Vec<u8>, Error> {
    let atom_len = match version {
        IPVersion::IPv4 => COMPACT_V4_LEN,
        IPVersion::IPv6 => COMPACT_V6_LEN,
    };

    let mut bytes: Vec<u8> = Vec::with_capacity(endpoints.len() * atom_len);

    for endpoint in endpoints {
        match (endpoint.ip(), version) {
            (IpAddr::V4(ip), IPVersion::IPv4) => bytes.extend_from_slice(&encode_v4(ip, endpoint.port())),
            (IpAddr::V6(ip), IPVersion::IPv6) => bytes.extend_from_slice(&encode_v6(ip, endpoint.port())),
            _ => {
                return Err(Error::MixedAddressFamilies {
                    endpoint: *endpoint,
                    expected: version,
                    location: Location::caller(),
                })
            }
        }
    }

    Ok(bytes)
}

/// Unpacks one 6-byte atom into an IPv4 endpoint.
///
/// # Errors
///
/// Will return [`Error::InvalidBlobLength`] if the slice is not exactly 6
/// bytes long.
pub fn decode_v4(bytes: &[u8]) -> Result<Endpoint, Error> {
    let atom: [u8; COMPACT_V4_LEN] = bytes.try_into().map_err(|_| Error::InvalidBlobLength {
        len: bytes.len(),
        atom_len: COMPACT_V4_LEN,
        location: Location::caller(),
    })?;

    let ip = Ipv4Addr::from(u32::from_be_bytes(atom[..4].try_into().expect("the slice should be 4 bytes")));
    let port = u16::from_be_bytes(atom[4..].try_into().expect("the slice should be 2 bytes"));

    Ok(Endpoint::new(IpAddr::V4(ip), port))
}

/// Unpacks one 18-byte atom into an IPv6 endpoint.
///
/// # Errors
///
/// Will return [`Error::InvalidBlobLength`] if the slice is not exactly 18
/// bytes long.
pub fn decode_v6(bytes: &[u8]) -> Result<Endpoint, Error> {
    let atom: [u8; COMPACT_V6_LEN] = bytes.try_into().map_err(|_| Error::InvalidBlobLength {
        len: bytes.len(),
        atom_len: COMPACT_V6_LEN,
        location: Location::caller(),
    })?;

    let ip = Ipv6Addr::from(u128::from_be_bytes(atom[..16].try_into().expect("the slice should be 16 bytes")));
    let port = u16::from_be_bytes(atom[16..].try_into().expect("the slice should be 2 bytes"));

    Ok(Endpoint::new(IpAddr::V6(ip), port))
}

/// Unpacks a whole `peers` blob.
///
/// # Errors
///
/// Will return [`Error::InvalidBlobLength`] if the blob length is not a
/// multiple of 6. There is no auto-detection across a mixed-length stream.
pub fn decode_many_v4(bytes: &[u8]) -> Result<Vec<Endpoint>, Error> {
    if bytes.len() % COMPACT_V4_LEN != 0 {
        return Err(Error::InvalidBlobLength {
            len: bytes.len(),
            atom_len: COMPACT_V4_LEN,
            location: Location::caller(),
        });
    }
    bytes.chunks(COMPACT_V4_LEN).map(decode_v4).collect()
}

/// Unpacks a whole `peers6` blob.
///
/// # Errors
///
/// Will return [`Error::InvalidBlobLength`] if the blob length is not a
/// multiple of 18.
pub fn decode_many_v6(bytes: &[u8]) -> Result<Vec<Endpoint>, Error> {
    if bytes.len() % COMPACT_V6_LEN != 0 {
        return Err(Error::InvalidBlobLength {
            len: bytes.len(),
            atom_len: COMPACT_V6_LEN,
            location: Location::caller(),
        });
    }
    bytes.chunks(COMPACT_V6_LEN).map(decode_v6).collect()
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::str::FromStr;

    use super::{decode_many_v4, decode_many_v6, decode_v4, decode_v6, encode_many, encode_v4, encode_v6};
    use crate::peer::Endpoint;
    use crate::IPVersion;

    #[test]
    fn it_should_pack_an_ipv4_endpoint_into_six_bytes() {
        let bytes = encode_v4(Ipv4Addr::new(198, 51, 100, 7), 6881);

        assert_eq!(bytes, [0xc6, 0x33, 0x64, 0x07, 0x1a, 0xe1]);
    }

    #[test]
    fn it_should_pack_an_ipv6_endpoint_into_eighteen_bytes() {
        let ip = Ipv6Addr::from_str("2001:db8::1").unwrap();

        let bytes = encode_v6(ip, 6881);

        assert_eq!(bytes.len(), 18);
        assert_eq!(&bytes[..16], &u128::from(ip).to_be_bytes());
        assert_eq!(&bytes[16..], &[0x1a, 0xe1]);
    }

    #[test]
    fn it_should_round_trip_an_ipv4_endpoint() {
        let endpoint = "198.51.100.7:6881".parse::<Endpoint>().unwrap();

        let bytes = encode_many(&[endpoint], IPVersion::IPv4).unwrap();

        assert_eq!(decode_v4(&bytes).unwrap(), endpoint);
    }

    #[test]
    fn it_should_round_trip_an_ipv6_endpoint() {
        let endpoint = "[2001:db8::1]:6881".parse::<Endpoint>().unwrap();

        let bytes = encode_many(&[endpoint], IPVersion::IPv6).unwrap();

        assert_eq!(decode_v6(&bytes).unwrap(), endpoint);
    }

    #[test]
    fn it_should_reject_packing_a_mixed_family_peer_list() {
        let v4 = "198.51.100.7:6881".parse::<Endpoint>().unwrap();
        let v6 = "[2001:db8::1]:6881".parse::<Endpoint>().unwrap();

        assert!(encode_many(&[v4, v6], IPVersion::IPv4).is_err());
        assert!(encode_many(&[v4, v6], IPVersion::IPv6).is_err());
    }

    #[test]
    fn it_should_reject_blobs_whose_length_is_not_a_multiple_of_the_atom_size() {
        assert!(decode_many_v4(&[0u8; 7]).is_err());
        assert!(decode_many_v6(&[0u8; 19]).is_err());

        // An IPv4 blob of two peers cannot be decoded as IPv6 and vice versa.
        assert!(decode_many_v6(&[0u8; 12]).is_err());
        assert!(decode_many_v4(&[0u8; 9]).is_err());
    }

    #[test]
    fn it_should_unpack_a_blob_with_multiple_peers() {
        let first = "198.51.100.7:6881".parse::<Endpoint>().unwrap();
        let second = "198.51.100.8:6882".parse::<Endpoint>().unwrap();

        let bytes = encode_many(&[first, second], IPVersion::IPv4).unwrap();

        assert_eq!(decode_many_v4(&bytes).unwrap(), vec![first, second]);
    }
}
