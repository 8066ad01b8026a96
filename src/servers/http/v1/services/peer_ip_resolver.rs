//! This service resolves the client IP from the request.
//!
//! The resolved IP identifies the peer in the tracker: joined with the `port`
//! param it becomes the peer's endpoint in the swarm and in the peer lists
//! handed to other peers.
//!
//! The resolution order is:
//!
//! 1. The `ip` query parameter (peers behind NAT announcing their public IP).
//! 2. The first (leftmost) token of the `X-Forwarded-For` header.
//! 3. The `X-Real-IP` header.
//! 4. The transport remote address.
use std::net::IpAddr;
use std::panic::Location;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::servers::http::v1::responses;

/// This struct contains the sources from which the client IP can be
/// obtained, beyond the `ip` query param carried by the announce request
/// itself.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ClientIpSources {
    /// The first (leftmost) IP from the `X-Forwarded-For` HTTP header.
    pub leftmost_x_forwarded_for: Option<IpAddr>,
    /// The IP from the `X-Real-IP` HTTP header.
    pub x_real_ip: Option<IpAddr>,
    /// The IP from the connection info.
    pub connection_info_ip: Option<IpAddr>,
}

/// The error that can occur when resolving the client IP.
#[derive(Error, Debug)]
pub enum PeerIpResolutionError {
    /// No source provided an IP. With a direct connection this cannot happen;
    /// it means the connection info was not wired into the router.
    #[error("cannot get the client IP from the request in {location}")]
    MissingClientIp { location: &'static Location<'static> },
}

impl From<PeerIpResolutionError> for responses::error::Error {
    fn from(error: PeerIpResolutionError) -> Self {
        Self {
            failure_reason: format!("Error resolving peer IP: {error}"),
        }
    }
}

/// Resolves the client IP from the `ip` query param override and the request
/// sources, in the documented order.
///
/// # Errors
///
/// Will return a [`PeerIpResolutionError`] if no source yields an IP.
pub fn invoke(ip_param: Option<IpAddr>, sources: &ClientIpSources) -> Result<IpAddr, PeerIpResolutionError> {
    ip_param
        .or(sources.leftmost_x_forwarded_for)
        .or(sources.x_real_ip)
        .or(sources.connection_info_ip)
        .ok_or(PeerIpResolutionError::MissingClientIp {
            location: Location::caller(),
        })
}

#[cfg(test)]
mod tests {
    use std::net::IpAddr;
    use std::str::FromStr;

    use super::{invoke, ClientIpSources, PeerIpResolutionError};

    fn ip(value: &str) -> IpAddr {
        IpAddr::from_str(value).unwrap()
    }

    fn all_sources() -> ClientIpSources {
        ClientIpSources {
            leftmost_x_forwarded_for: Some(ip("203.0.113.2")),
            x_real_ip: Some(ip("203.0.113.3")),
            connection_info_ip: Some(ip("203.0.113.4")),
        }
    }

    #[test]
    fn the_ip_query_param_should_have_the_highest_priority() {
        let resolved = invoke(Some(ip("203.0.113.1")), &all_sources()).unwrap();

        assert_eq!(resolved, ip("203.0.113.1"));
    }

    #[test]
    fn the_leftmost_x_forwarded_for_ip_should_come_second() {
        let resolved = invoke(None, &all_sources()).unwrap();

        assert_eq!(resolved, ip("203.0.113.2"));
    }

    #[test]
    fn the_x_real_ip_should_come_third() {
        let sources = ClientIpSources {
            leftmost_x_forwarded_for: None,
            ..all_sources()
        };

        assert_eq!(invoke(None, &sources).unwrap(), ip("203.0.113.3"));
    }

    #[test]
    fn the_connection_info_ip_should_be_the_fallback() {
        let sources = ClientIpSources {
            leftmost_x_forwarded_for: None,
            x_real_ip: None,
            ..all_sources()
        };

        assert_eq!(invoke(None, &sources).unwrap(), ip("203.0.113.4"));
    }

    #[test]
    fn it_should_fail_when_no_source_provides_an_ip() {
        let sources = ClientIpSources {
            leftmost_x_forwarded_for: None,
            x_real_ip: None,
            connection_info_ip: None,
        };

        let error = invoke(None, &sources).unwrap_err();

        assert!(matches!(error, PeerIpResolutionError::MissingClientIp { .. }));
    }
}
