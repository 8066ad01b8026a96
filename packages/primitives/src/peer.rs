//! Peer identity types used by the tracker.
//!
//! Inside a swarm a peer is identified by its reachable [`Endpoint`]: the
//! `(IP, port)` pair other peers can connect to. The 20-byte [`Id`] sent by
//! `BitTorrent` clients is validated on announce but it is not used as the
//! store identity.
use std::net::{IpAddr, SocketAddr};
use std::panic::Location;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::IPVersion;

/// A peer endpoint: the `(IP, port)` pair a peer is listening on.
///
/// The canonical text form uses a bracketed host for IPv6
/// (`[2001:db8::1]:6881`). IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) are
/// normalized to plain IPv4 on construction, so an endpoint is always
/// classified by the family it is reachable on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Endpoint(SocketAddr);

impl Endpoint {
    #[must_use]
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self(SocketAddr::new(ip.to_canonical(), port))
    }

    #[must_use]
    pub fn ip(&self) -> IpAddr {
        self.0.ip()
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.0.port()
    }

    /// The IP version the endpoint is reachable on: IPV4 or IPV6.
    #[must_use]
    pub fn ip_version(&self) -> IPVersion {
        if self.0.is_ipv4() {
            return IPVersion::IPv4;
        }
        IPVersion::IPv6
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Endpoint {
    type Err = std::net::AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let addr = s.parse::<SocketAddr>()?;
        Ok(Self::from(addr))
    }
}

/// The role a peer plays in a swarm.
///
/// A peer with `left == 0` possesses the full content and seeds it; any other
/// peer is still downloading. A peer belongs to exactly one of the two role
/// sets of a swarm at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Seeder,
    Leecher,
}

impl Role {
    /// The role derived from the number of bytes the peer still has `left` to
    /// download.
    #[must_use]
    pub fn from_bytes_left(left: i64) -> Self {
        if left == 0 {
            Self::Seeder
        } else {
            Self::Leecher
        }
    }

    /// The role whose set a peer must be removed from when it enters this one.
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            Self::Seeder => Self::Leecher,
            Self::Leecher => Self::Seeder,
        }
    }
}

/// Error returned when trying to convert an invalid peer id from another type.
///
/// Usually because the source format does not contain 20 bytes.
#[derive(Error, Debug)]
pub enum IdConversionError {
    #[error("not enough bytes for peer id: {message} {location}")]
    NotEnoughBytes {
        location: &'static Location<'static>,
        message: String,
    },
    #[error("too many bytes for peer id: {message} {location}")]
    TooManyBytes {
        location: &'static Location<'static>,
        message: String,
    },
}

pub const PEER_ID_BYTES_LEN: usize = 20;

/// The 20-byte identifier a `BitTorrent` client chooses for itself and sends
/// on every announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(pub [u8; PEER_ID_BYTES_LEN]);

impl Id {
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PEER_ID_BYTES_LEN] {
        self.0
    }
}

impl TryFrom<Vec<u8>> for Id {
    type Error = IdConversionError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.len() < PEER_ID_BYTES_LEN {
            return Err(IdConversionError::NotEnoughBytes {
                location: Location::caller(),
                message: format! {"got {} bytes, expected {}", bytes.len(), PEER_ID_BYTES_LEN},
            });
        }
        if bytes.len() > PEER_ID_BYTES_LEN {
            return Err(IdConversionError::TooManyBytes {
                location: Location::caller(),
                message: format! {"got {} bytes, expected {}", bytes.len(), PEER_ID_BYTES_LEN},
            });
        }
        let mut data = [0u8; PEER_ID_BYTES_LEN];
        data.clone_from_slice(&bytes);
        Ok(Self(data))
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tmp = [0u8; 2 * PEER_ID_BYTES_LEN];
        binascii::bin2hex(&self.0, &mut tmp).expect("it should fit in the output buffer");
        write!(f, "0x{}", std::str::from_utf8(&tmp).unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    mod endpoint {
        use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
        use std::str::FromStr;

        use crate::peer::Endpoint;
        use crate::IPVersion;

        #[test]
        fn it_should_use_the_plain_form_for_ipv4() {
            let endpoint = Endpoint::new(IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7)), 6881);

            assert_eq!(endpoint.to_string(), "198.51.100.7:6881");
            assert_eq!(endpoint.ip_version(), IPVersion::IPv4);
        }

        #[test]
        fn it_should_use_the_bracketed_form_for_ipv6() {
            let endpoint = Endpoint::new(IpAddr::V6(Ipv6Addr::from_str("2001:db8::1").unwrap()), 6881);

            assert_eq!(endpoint.to_string(), "[2001:db8::1]:6881");
            assert_eq!(endpoint.ip_version(), IPVersion::IPv6);
        }

        #[test]
        fn it_should_classify_ipv4_mapped_ipv6_addresses_as_ipv4() {
            let endpoint = Endpoint::new(IpAddr::V6(Ipv6Addr::from_str("::ffff:1.2.3.4").unwrap()), 6881);

            assert_eq!(endpoint.ip_version(), IPVersion::IPv4);
            assert_eq!(endpoint.to_string(), "1.2.3.4:6881");
        }

        #[test]
        fn it_should_round_trip_through_the_canonical_text_form() {
            for raw in ["198.51.100.7:6881", "[2001:db8::1]:6881"] {
                let endpoint = raw.parse::<Endpoint>().unwrap();
                assert_eq!(endpoint.to_string(), raw);
            }
        }
    }

    mod role {
        use crate::peer::Role;

        #[test]
        fn it_should_be_derived_from_the_bytes_left_to_download() {
            assert_eq!(Role::from_bytes_left(0), Role::Seeder);
            assert_eq!(Role::from_bytes_left(1), Role::Leecher);
            assert_eq!(Role::from_bytes_left(100), Role::Leecher);
        }

        #[test]
        fn it_should_know_its_opposite_set() {
            assert_eq!(Role::Seeder.opposite(), Role::Leecher);
            assert_eq!(Role::Leecher.opposite(), Role::Seeder);
        }
    }

    mod peer_id {
        use crate::peer::Id;

        #[test]
        fn it_should_fail_trying_to_convert_from_a_byte_vector_with_less_than_20_bytes() {
            assert!(Id::try_from([0; 19].to_vec()).is_err());
        }

        #[test]
        fn it_should_fail_trying_to_convert_from_a_byte_vector_with_more_than_20_bytes() {
            assert!(Id::try_from([0; 21].to_vec()).is_err());
        }

        #[test]
        fn it_should_be_converted_to_hex_string() {
            let id = Id(*b"-qB00000000000000000");
            assert_eq!(id.to_string(), "0x2d71423030303030303030303030303030303030");
        }
    }
}
