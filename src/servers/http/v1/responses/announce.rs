//! `Announce` response for the HTTP tracker.
//!
//! Data structures and logic to build the `announce` response, in both the
//! dictionary format of
//! [BEP 03](https://www.bittorrent.org/beps/bep_0003.html) and the compact
//! format of [BEP 23](https://www.bittorrent.org/beps/bep_0023.html).
//!
//! IPv4 and IPv6 peers are always carried in separate fields (`peers` and
//! `peers6`, per [BEP 07](https://www.bittorrent.org/beps/bep_0007.html)).
//! `peers` is present even when empty; `peers6` only when it has content.
use std::net::IpAddr;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use hive_tracker_bencode::{ben_bytes, ben_int, ben_map, Bencode};
use hive_tracker_configuration::AnnouncePolicy;
use hive_tracker_primitives::peer::Endpoint;
use hive_tracker_primitives::swarm_metadata::SwarmMetadata;
use hive_tracker_primitives::{compact, IPVersion};

use crate::core::AnnounceData;

/// Compact `announce` response.
///
/// _"To reduce the size of tracker responses and to reduce memory and
/// computational requirements in trackers, trackers may return peers as a
/// packed string rather than as a bencoded list."_
///
/// ```rust
/// use std::str::FromStr;
/// use hive_tracker::servers::http::v1::responses::announce::Compact;
/// use hive_tracker_configuration::AnnouncePolicy;
/// use hive_tracker_primitives::peer::Endpoint;
/// use hive_tracker_primitives::swarm_metadata::SwarmMetadata;
///
/// let response = Compact {
///     policy: AnnouncePolicy {
///         interval: 111,
///         interval_min: 222,
///     },
///     stats: SwarmMetadata {
///         downloaded: 0,
///         complete: 333,
///         incomplete: 444,
///     },
///     peers: vec![
///         // 0x69 = 'i', 0x70 = 'p': the packed bytes are readable ASCII
///         Endpoint::from_str("105.105.105.105:28784").unwrap(),
///         Endpoint::from_str("[6969:6969:6969:6969:6969:6969:6969:6969]:28784").unwrap(),
///     ],
/// };
///
/// let bytes = response.body().unwrap();
///
/// let expected_bytes =
///     // cspell:disable-next-line
///     b"d8:completei333e10:incompletei444e8:intervali111e12:min intervali222e5:peers6:iiiipp6:peers618:iiiiiiiiiiiiiiiippe";
///
/// assert_eq!(
///     String::from_utf8(bytes).unwrap(),
///     String::from_utf8(expected_bytes.to_vec()).unwrap()
/// );
/// ```
#[derive(Debug, PartialEq)]
pub struct Compact {
    pub policy: AnnouncePolicy,
    pub stats: SwarmMetadata,
    /// The sampled swarm members, both families mixed; they are split into
    /// `peers`/`peers6` during serialization.
    pub peers: Vec<Endpoint>,
}

impl Compact {
    /// Returns the bencoded compact response as a byte vector.
    ///
    /// # Errors
    ///
    /// Will return a [`compact::Error`] if an endpoint cannot be packed into
    /// its family blob. Unreachable in practice: the peer list is split by
    /// family first.
    pub fn body(&self) -> Result<Vec<u8>, compact::Error> {
        let (peers_v4, peers_v6) = split_by_family(&self.peers);

        let mut response = ben_map! {
            "complete" => ben_int!(i64::from(self.stats.complete)),
            "incomplete" => ben_int!(i64::from(self.stats.incomplete)),
            "interval" => ben_int!(i64::from(self.policy.interval)),
            "min interval" => ben_int!(i64::from(self.policy.interval_min)),
            "peers" => ben_bytes!(compact::encode_many(&peers_v4, IPVersion::IPv4)?)
        };

        if !peers_v6.is_empty() {
            response
                .dict_mut()
                .expect("the response should be a dictionary")
                .insert(b"peers6".to_vec(), ben_bytes!(compact::encode_many(&peers_v6, IPVersion::IPv6)?));
        }

        Ok(response.encode())
    }
}

impl IntoResponse for Compact {
    fn into_response(self) -> Response {
        match self.body() {
            Ok(bytes) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], bytes).into_response(),
            // Internal encode failure, not an in-protocol error.
            Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
        }
    }
}

impl From<AnnounceData> for Compact {
    fn from(data: AnnounceData) -> Self {
        Self {
            policy: data.policy,
            stats: data.stats,
            peers: data.peers,
        }
    }
}

/// Normal (non compact) `announce` response.
///
/// It's a bencoded dictionary with the peers as a list of dictionaries, like
/// the compact response but with one `{ip, peer id, port}` dictionary per
/// peer. The tracker does not keep peer ids, so `peer id` is serialized
/// empty.
///
/// ```rust
/// use std::str::FromStr;
/// use hive_tracker::servers::http::v1::responses::announce::NonCompact;
/// use hive_tracker_configuration::AnnouncePolicy;
/// use hive_tracker_primitives::peer::Endpoint;
/// use hive_tracker_primitives::swarm_metadata::SwarmMetadata;
///
/// let response = NonCompact {
///     policy: AnnouncePolicy {
///         interval: 111,
///         interval_min: 222,
///     },
///     stats: SwarmMetadata {
///         downloaded: 0,
///         complete: 333,
///         incomplete: 444,
///     },
///     peers: vec![Endpoint::from_str("105.105.105.105:28784").unwrap()],
/// };
///
/// let expected_bytes = b"d8:completei333e10:incompletei444e8:intervali111e12:min intervali222e5:peersld2:ip15:105.105.105.1057:peer id0:4:porti28784eeee";
///
/// assert_eq!(
///     String::from_utf8(response.body()).unwrap(),
///     String::from_utf8(expected_bytes.to_vec()).unwrap()
/// );
/// ```
#[derive(Debug, PartialEq)]
pub struct NonCompact {
    pub policy: AnnouncePolicy,
    pub stats: SwarmMetadata,
    /// The sampled swarm members, both families mixed; they are split into
    /// `peers`/`peers6` during serialization.
    pub peers: Vec<Endpoint>,
}

/// Peer information in the [`NonCompact`] response.
#[derive(Debug, PartialEq)]
pub struct NonCompactPeer {
    /// The peer's IP address.
    pub ip: IpAddr,
    /// The peer's port number.
    pub port: u16,
}

impl NonCompactPeer {
    #[must_use]
    fn ben_map(&self) -> Bencode {
        ben_map! {
            "ip" => ben_bytes!(self.ip.to_string()),
            "peer id" => ben_bytes!(""),
            "port" => ben_int!(i64::from(self.port))
        }
    }
}

impl From<Endpoint> for NonCompactPeer {
    fn from(endpoint: Endpoint) -> Self {
        Self {
            ip: endpoint.ip(),
            port: endpoint.port(),
        }
    }
}

impl NonCompact {
    /// Returns the bencoded body of the non-compact response.
    #[must_use]
    pub fn body(&self) -> Vec<u8> {
        let (peers_v4, peers_v6) = split_by_family(&self.peers);

        let mut response = ben_map! {
            "complete" => ben_int!(i64::from(self.stats.complete)),
            "incomplete" => ben_int!(i64::from(self.stats.incomplete)),
            "interval" => ben_int!(i64::from(self.policy.interval)),
            "min interval" => ben_int!(i64::from(self.policy.interval_min)),
            "peers" => peers_list(&peers_v4)
        };

        if !peers_v6.is_empty() {
            response
                .dict_mut()
                .expect("the response should be a dictionary")
                .insert(b"peers6".to_vec(), peers_list(&peers_v6));
        }

        response.encode()
    }
}

impl IntoResponse for NonCompact {
    fn into_response(self) -> Response {
        (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], self.body()).into_response()
    }
}

impl From<AnnounceData> for NonCompact {
    fn from(data: AnnounceData) -> Self {
        Self {
            policy: data.policy,
            stats: data.stats,
            peers: data.peers,
        }
    }
}

fn split_by_family(peers: &[Endpoint]) -> (Vec<Endpoint>, Vec<Endpoint>) {
    peers
        .iter()
        .copied()
        .partition(|endpoint| endpoint.ip_version() == IPVersion::IPv4)
}

fn peers_list(endpoints: &[Endpoint]) -> Bencode {
    Bencode::List(
        endpoints
            .iter()
            .map(|endpoint| NonCompactPeer::from(*endpoint).ben_map())
            .collect(),
    )
}

#[cfg(test)]
mod tests {

    use std::str::FromStr;

    use hive_tracker_configuration::AnnouncePolicy;
    use hive_tracker_primitives::peer::Endpoint;
    use hive_tracker_primitives::swarm_metadata::SwarmMetadata;

    use super::{Compact, NonCompact};

    // Some ascii values used in tests:
    //
    // +-----------------+
    // | Dec | Hex | Chr |
    // +-----------------+
    // | 105 | 69  | i   |
    // | 112 | 70  | p   |
    // +-----------------+
    //
    // IP addresses and port numbers are chosen so that their bencoded
    // representation is also a valid string which makes asserts more readable.

    fn sample_policy() -> AnnouncePolicy {
        AnnouncePolicy {
            interval: 111,
            interval_min: 222,
        }
    }

    fn sample_stats() -> SwarmMetadata {
        SwarmMetadata {
            downloaded: 0,
            complete: 333,
            incomplete: 444,
        }
    }

    #[test]
    fn compact_announce_response_can_be_bencoded() {
        let response = Compact {
            policy: sample_policy(),
            stats: sample_stats(),
            peers: vec![
                // IPV4
                Endpoint::from_str("105.105.105.105:28784").unwrap(),
                // IPV6
                Endpoint::from_str("[6969:6969:6969:6969:6969:6969:6969:6969]:28784").unwrap(),
            ],
        };

        let bytes = response.body().unwrap();

        let expected_bytes =
            // cspell:disable-next-line
            b"d8:completei333e10:incompletei444e8:intervali111e12:min intervali222e5:peers6:iiiipp6:peers618:iiiiiiiiiiiiiiiippe";

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            String::from_utf8(expected_bytes.to_vec()).unwrap()
        );
    }

    #[test]
    fn the_compact_peers_field_should_be_present_even_when_empty() {
        let response = Compact {
            policy: sample_policy(),
            stats: SwarmMetadata::zeroed(),
            peers: vec![],
        };

        let bytes = response.body().unwrap();

        let expected_bytes = b"d8:completei0e10:incompletei0e8:intervali111e12:min intervali222e5:peers0:e";

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            String::from_utf8(expected_bytes.to_vec()).unwrap()
        );
    }

    #[test]
    fn the_compact_peers6_field_should_be_absent_without_ipv6_peers() {
        let response = Compact {
            policy: sample_policy(),
            stats: sample_stats(),
            peers: vec![Endpoint::from_str("105.105.105.105:28784").unwrap()],
        };

        let bytes = response.body().unwrap();

        let expected_bytes =
            b"d8:completei333e10:incompletei444e8:intervali111e12:min intervali222e5:peers6:iiiippe";

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            String::from_utf8(expected_bytes.to_vec()).unwrap()
        );
    }

    #[test]
    fn non_compact_announce_response_can_be_bencoded() {
        let response = NonCompact {
            policy: sample_policy(),
            stats: sample_stats(),
            peers: vec![
                // IPV4
                Endpoint::from_str("105.105.105.105:28784").unwrap(),
                // IPV6
                Endpoint::from_str("[6969:6969:6969:6969:6969:6969:6969:6969]:28784").unwrap(),
            ],
        };

        let bytes = response.body();

        // cspell:disable-next-line
        let expected_bytes = b"d8:completei333e10:incompletei444e8:intervali111e12:min intervali222e5:peersld2:ip15:105.105.105.1057:peer id0:4:porti28784eee6:peers6ld2:ip39:6969:6969:6969:6969:6969:6969:6969:69697:peer id0:4:porti28784eeee";

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            String::from_utf8(expected_bytes.to_vec()).unwrap()
        );
    }

    #[test]
    fn the_non_compact_peers_list_should_be_present_even_when_empty() {
        let response = NonCompact {
            policy: sample_policy(),
            stats: SwarmMetadata::zeroed(),
            peers: vec![],
        };

        let expected_bytes = b"d8:completei0e10:incompletei0e8:intervali111e12:min intervali222e5:peerslee";

        assert_eq!(
            String::from_utf8(response.body()).unwrap(),
            String::from_utf8(expected_bytes.to_vec()).unwrap()
        );
    }
}
