//! `Announce` request for the HTTP tracker.
//!
//! Data structures and logic for parsing the `announce` request.
use std::fmt;
use std::net::IpAddr;
use std::panic::Location;
use std::str::FromStr;

use hive_tracker_primitives::info_hash::{ConversionError, InfoHash};
use hive_tracker_primitives::peer::{self, IdConversionError};
use hive_tracker_primitives::NumberOfBytes;
use thiserror::Error;

use crate::servers::http::percent_encoding::{percent_decode_info_hash, percent_decode_peer_id};
use crate::servers::http::v1::query::{ParseQueryError, Query};
use crate::servers::http::v1::responses;

// Query param names
const INFO_HASH: &str = "info_hash";
const PEER_ID: &str = "peer_id";
const PORT: &str = "port";
const DOWNLOADED: &str = "downloaded";
const UPLOADED: &str = "uploaded";
const LEFT: &str = "left";
const EVENT: &str = "event";
const COMPACT: &str = "compact";
const NUMWANT: &str = "numwant";
const IP: &str = "ip";

/// The `Announce` request. Fields use the domain types after parsing the
/// query params of the request.
///
/// > **NOTICE**: [BEP 03](https://www.bittorrent.org/beps/bep_0003.html)
/// specifies that only the peer `ip` and `event` are optional. However, the
/// tracker defines default values for the other optional params.
#[derive(Debug, PartialEq)]
pub struct Announce {
    // Mandatory params
    /// The `InfoHash` of the torrent.
    pub info_hash: InfoHash,
    /// The `peer::Id` of the peer.
    pub peer_id: peer::Id,
    /// The port the peer is listening on, in `1..=65535`.
    pub port: u16,

    // Optional params
    /// The number of bytes downloaded by the peer.
    pub downloaded: Option<NumberOfBytes>,
    /// The number of bytes uploaded by the peer.
    pub uploaded: Option<NumberOfBytes>,
    /// The number of bytes the peer still has to download. An absent value
    /// means the peer is treated as a leecher.
    pub left: Option<NumberOfBytes>,
    /// The event that the peer is reporting: `Started`, `Stopped` or
    /// `Completed`.
    pub event: Option<Event>,
    /// Whether the response should be in compact mode or not.
    pub compact: Option<Compact>,
    /// How many peers the client wants back. Clamped by the tracker.
    pub numwant: Option<u16>,
    /// Client IP override for peers behind NAT.
    pub ip: Option<IpAddr>,
}

/// Errors that can occur when parsing the `Announce` request.
///
/// The `info_hash` and `peer_id` query params are special because they
/// contain binary data. The `info_hash` is a 20-byte SHA1 hash and the
/// `peer_id` is a 20-byte array.
#[derive(Error, Debug)]
pub enum ParseAnnounceQueryError {
    /// The request has no query component at all.
    #[error("missing query params for announce request in {location}")]
    MissingParams { location: &'static Location<'static> },
    /// A mandatory param is missing.
    #[error("missing param {param_name} in {location}")]
    MissingParam {
        location: &'static Location<'static>,
        param_name: String,
    },
    /// The param cannot be parsed into the domain type.
    #[error("invalid param value {param_value} for {param_name} in {location}")]
    InvalidParam {
        param_name: String,
        param_value: String,
        location: &'static Location<'static>,
    },
    /// The param value is out of range.
    #[error("param value overflow {param_value} for {param_name} in {location}")]
    NumberOfBytesOverflow {
        param_name: String,
        param_value: String,
        location: &'static Location<'static>,
    },
    /// The `info_hash` is invalid.
    #[error("invalid param value {param_value} for {param_name}: {source}")]
    InvalidInfoHashParam {
        param_name: String,
        param_value: String,
        source: ConversionError,
    },
    /// The `peer_id` is invalid.
    #[error("invalid param value {param_value} for {param_name}: {source}")]
    InvalidPeerIdParam {
        param_name: String,
        param_value: String,
        source: IdConversionError,
    },
}

/// The event that the peer is reporting: `started`, `completed` or `stopped`.
///
/// If the event is not present or empty that means that the peer is just
/// updating its status. It's one of the announcements done at regular
/// intervals.
#[derive(PartialEq, Eq, Debug)]
pub enum Event {
    /// Event sent when a download first begins.
    Started,
    /// Event sent when the downloader ceases downloading.
    Stopped,
    /// Event sent when the download is complete.
    /// No `completed` is sent if the file was complete when started.
    Completed,
}

impl FromStr for Event {
    type Err = ParseAnnounceQueryError;

    fn from_str(raw_param: &str) -> Result<Self, Self::Err> {
        match raw_param {
            "started" => Ok(Self::Started),
            "stopped" => Ok(Self::Stopped),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseAnnounceQueryError::InvalidParam {
                param_name: EVENT.to_owned(),
                param_value: raw_param.to_owned(),
                location: Location::caller(),
            }),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Started => write!(f, "started"),
            Event::Stopped => write!(f, "stopped"),
            Event::Completed => write!(f, "completed"),
        }
    }
}

/// Whether the `announce` response should be in compact mode or not.
///
/// Refer to [BEP 23. Tracker Returns Compact Peer Lists](https://www.bittorrent.org/beps/bep_0023.html).
#[derive(PartialEq, Eq, Debug)]
pub enum Compact {
    /// The client advises the tracker that the client prefers the compact
    /// format.
    Accepted = 1,
    /// The client advises the tracker that it prefers the original format
    /// described in [BEP 03](https://www.bittorrent.org/beps/bep_0003.html).
    NotAccepted = 0,
}

impl FromStr for Compact {
    type Err = ParseAnnounceQueryError;

    fn from_str(raw_param: &str) -> Result<Self, Self::Err> {
        match raw_param {
            "1" => Ok(Self::Accepted),
            "0" => Ok(Self::NotAccepted),
            _ => Err(ParseAnnounceQueryError::InvalidParam {
                param_name: COMPACT.to_owned(),
                param_value: raw_param.to_owned(),
                location: Location::caller(),
            }),
        }
    }
}

impl From<ParseQueryError> for responses::error::Error {
    fn from(err: ParseQueryError) -> Self {
        responses::error::Error {
            failure_reason: format!("Cannot parse query params: {err}"),
        }
    }
}

impl From<ParseAnnounceQueryError> for responses::error::Error {
    fn from(err: ParseAnnounceQueryError) -> Self {
        responses::error::Error {
            failure_reason: format!("Cannot parse query params for announce request: {err}"),
        }
    }
}

impl TryFrom<Query> for Announce {
    type Error = ParseAnnounceQueryError;

    fn try_from(query: Query) -> Result<Self, Self::Error> {
        Ok(Self {
            info_hash: extract_info_hash(&query)?,
            peer_id: extract_peer_id(&query)?,
            port: extract_port(&query)?,
            downloaded: extract_number_of_bytes_from_param(DOWNLOADED, &query)?,
            uploaded: extract_number_of_bytes_from_param(UPLOADED, &query)?,
            left: extract_number_of_bytes_from_param(LEFT, &query)?,
            event: extract_event(&query)?,
            compact: extract_compact(&query)?,
            numwant: extract_numwant(&query)?,
            ip: extract_ip(&query)?,
        })
    }
}

// Mandatory params

fn extract_info_hash(query: &Query) -> Result<InfoHash, ParseAnnounceQueryError> {
    match query.get_param(INFO_HASH) {
        Some(raw_param) => {
            Ok(
                percent_decode_info_hash(&raw_param).map_err(|err| ParseAnnounceQueryError::InvalidInfoHashParam {
                    param_name: INFO_HASH.to_owned(),
                    param_value: raw_param.clone(),
                    source: err,
                })?,
            )
        }
        None => Err(ParseAnnounceQueryError::MissingParam {
            location: Location::caller(),
            param_name: INFO_HASH.to_owned(),
        }),
    }
}

fn extract_peer_id(query: &Query) -> Result<peer::Id, ParseAnnounceQueryError> {
    match query.get_param(PEER_ID) {
        Some(raw_param) => Ok(
            percent_decode_peer_id(&raw_param).map_err(|err| ParseAnnounceQueryError::InvalidPeerIdParam {
                param_name: PEER_ID.to_owned(),
                param_value: raw_param.clone(),
                source: err,
            })?,
        ),
        None => Err(ParseAnnounceQueryError::MissingParam {
            location: Location::caller(),
            param_name: PEER_ID.to_owned(),
        }),
    }
}

fn extract_port(query: &Query) -> Result<u16, ParseAnnounceQueryError> {
    match query.get_param(PORT) {
        Some(raw_param) => {
            let port = u16::from_str(&raw_param).map_err(|_e| ParseAnnounceQueryError::InvalidParam {
                param_name: PORT.to_owned(),
                param_value: raw_param.clone(),
                location: Location::caller(),
            })?;

            // Port zero is not a reachable endpoint.
            if port == 0 {
                return Err(ParseAnnounceQueryError::InvalidParam {
                    param_name: PORT.to_owned(),
                    param_value: raw_param.clone(),
                    location: Location::caller(),
                });
            }

            Ok(port)
        }
        None => Err(ParseAnnounceQueryError::MissingParam {
            location: Location::caller(),
            param_name: PORT.to_owned(),
        }),
    }
}

// Optional params

fn extract_number_of_bytes_from_param(param_name: &str, query: &Query) -> Result<Option<NumberOfBytes>, ParseAnnounceQueryError> {
    match query.get_param(param_name) {
        Some(raw_param) => {
            let number_of_bytes = u64::from_str(&raw_param).map_err(|_e| ParseAnnounceQueryError::InvalidParam {
                param_name: param_name.to_owned(),
                param_value: raw_param.clone(),
                location: Location::caller(),
            })?;

            Ok(Some(i64::try_from(number_of_bytes).map_err(|_e| {
                ParseAnnounceQueryError::NumberOfBytesOverflow {
                    param_name: param_name.to_owned(),
                    param_value: raw_param.clone(),
                    location: Location::caller(),
                }
            })?))
        }
        None => Ok(None),
    }
}

fn extract_event(query: &Query) -> Result<Option<Event>, ParseAnnounceQueryError> {
    match query.get_param(EVENT) {
        Some(raw_param) => Ok(Some(Event::from_str(&raw_param)?)),
        None => Ok(None),
    }
}

fn extract_compact(query: &Query) -> Result<Option<Compact>, ParseAnnounceQueryError> {
    match query.get_param(COMPACT) {
        Some(raw_param) => Ok(Some(Compact::from_str(&raw_param)?)),
        None => Ok(None),
    }
}

fn extract_numwant(query: &Query) -> Result<Option<u16>, ParseAnnounceQueryError> {
    match query.get_param(NUMWANT) {
        Some(raw_param) => Ok(Some(u16::from_str(&raw_param).map_err(|_e| {
            ParseAnnounceQueryError::InvalidParam {
                param_name: NUMWANT.to_owned(),
                param_value: raw_param.clone(),
                location: Location::caller(),
            }
        })?)),
        None => Ok(None),
    }
}

fn extract_ip(query: &Query) -> Result<Option<IpAddr>, ParseAnnounceQueryError> {
    match query.get_param(IP) {
        Some(raw_param) => {
            let decoded = percent_encoding::percent_decode_str(&raw_param)
                .decode_utf8()
                .map_err(|_e| ParseAnnounceQueryError::InvalidParam {
                    param_name: IP.to_owned(),
                    param_value: raw_param.clone(),
                    location: Location::caller(),
                })?;

            Ok(Some(IpAddr::from_str(&decoded).map_err(|_e| {
                ParseAnnounceQueryError::InvalidParam {
                    param_name: IP.to_owned(),
                    param_value: raw_param.clone(),
                    location: Location::caller(),
                }
            })?))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {

    mod announce_request {
        use std::net::{IpAddr, Ipv4Addr};

        use hive_tracker_primitives::info_hash::InfoHash;
        use hive_tracker_primitives::peer;

        use crate::servers::http::v1::query::Query;
        use crate::servers::http::v1::requests::announce::{Announce, Compact, Event};

        fn raw_query_with(params: &[(&str, &str)]) -> String {
            params
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<String>>()
                .join("&")
        }

        fn mandatory_params() -> Vec<(&'static str, &'static str)> {
            vec![
                ("info_hash", "%3B%24U%04%CF%5F%11%BB%DB%E1%20%1C%EAjk%F4Z%EE%1B%C0"),
                ("peer_id", "-qB00000000000000001"),
                ("port", "17548"),
            ]
        }

        #[test]
        fn should_be_instantiated_from_the_url_query_with_only_the_mandatory_params() {
            let raw_query = raw_query_with(&mandatory_params());

            let query = raw_query.parse::<Query>().unwrap();

            let announce_request = Announce::try_from(query).unwrap();

            assert_eq!(
                announce_request,
                Announce {
                    info_hash: "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0".parse::<InfoHash>().unwrap(),
                    peer_id: peer::Id(*b"-qB00000000000000001"),
                    port: 17548,
                    downloaded: None,
                    uploaded: None,
                    left: None,
                    event: None,
                    compact: None,
                    numwant: None,
                    ip: None,
                }
            );
        }

        #[test]
        fn should_be_instantiated_from_the_url_query_params() {
            let mut params = mandatory_params();
            params.extend([
                ("downloaded", "1"),
                ("uploaded", "2"),
                ("left", "3"),
                ("event", "started"),
                ("compact", "0"),
                ("numwant", "30"),
                ("ip", "126.0.0.1"),
            ]);

            let query = raw_query_with(&params).parse::<Query>().unwrap();

            let announce_request = Announce::try_from(query).unwrap();

            assert_eq!(
                announce_request,
                Announce {
                    info_hash: "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0".parse::<InfoHash>().unwrap(),
                    peer_id: peer::Id(*b"-qB00000000000000001"),
                    port: 17548,
                    downloaded: Some(1),
                    uploaded: Some(2),
                    left: Some(3),
                    event: Some(Event::Started),
                    compact: Some(Compact::NotAccepted),
                    numwant: Some(30),
                    ip: Some(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1))),
                }
            );
        }

        mod when_it_is_instantiated_from_the_url_query_params {
            use super::{mandatory_params, raw_query_with};
            use crate::servers::http::v1::query::Query;
            use crate::servers::http::v1::requests::announce::{Announce, ParseAnnounceQueryError};

            fn parse_with_extra(extra: (&str, &str)) -> Result<Announce, ParseAnnounceQueryError> {
                let mut params = mandatory_params();
                params.push(extra);
                Announce::try_from(raw_query_with(&params).parse::<Query>().unwrap())
            }

            #[test]
            fn it_should_fail_if_the_query_does_not_include_all_the_mandatory_params() {
                let raw_query_without_info_hash = "peer_id=-qB00000000000000001&port=17548";

                assert!(Announce::try_from(raw_query_without_info_hash.parse::<Query>().unwrap()).is_err());

                let raw_query_without_peer_id = "info_hash=%3B%24U%04%CF%5F%11%BB%DB%E1%20%1C%EAjk%F4Z%EE%1B%C0&port=17548";

                assert!(Announce::try_from(raw_query_without_peer_id.parse::<Query>().unwrap()).is_err());

                let raw_query_without_port =
                    "info_hash=%3B%24U%04%CF%5F%11%BB%DB%E1%20%1C%EAjk%F4Z%EE%1B%C0&peer_id=-qB00000000000000001";

                assert!(Announce::try_from(raw_query_without_port.parse::<Query>().unwrap()).is_err());
            }

            #[test]
            fn it_should_fail_if_the_info_hash_param_is_invalid() {
                let raw_query = raw_query_with(&[
                    ("info_hash", "INVALID_INFO_HASH_VALUE"),
                    ("peer_id", "-qB00000000000000001"),
                    ("port", "17548"),
                ]);

                assert!(Announce::try_from(raw_query.parse::<Query>().unwrap()).is_err());
            }

            #[test]
            fn it_should_fail_if_the_peer_id_param_is_invalid() {
                let raw_query = raw_query_with(&[
                    ("info_hash", "%3B%24U%04%CF%5F%11%BB%DB%E1%20%1C%EAjk%F4Z%EE%1B%C0"),
                    ("peer_id", "INVALID_PEER_ID_VALUE"),
                    ("port", "17548"),
                ]);

                assert!(Announce::try_from(raw_query.parse::<Query>().unwrap()).is_err());
            }

            #[test]
            fn it_should_fail_if_the_port_param_is_invalid() {
                let raw_query = raw_query_with(&[
                    ("info_hash", "%3B%24U%04%CF%5F%11%BB%DB%E1%20%1C%EAjk%F4Z%EE%1B%C0"),
                    ("peer_id", "-qB00000000000000001"),
                    ("port", "INVALID_PORT_VALUE"),
                ]);

                assert!(Announce::try_from(raw_query.parse::<Query>().unwrap()).is_err());
            }

            #[test]
            fn it_should_fail_if_the_port_is_zero() {
                let raw_query = raw_query_with(&[
                    ("info_hash", "%3B%24U%04%CF%5F%11%BB%DB%E1%20%1C%EAjk%F4Z%EE%1B%C0"),
                    ("peer_id", "-qB00000000000000001"),
                    ("port", "0"),
                ]);

                assert!(Announce::try_from(raw_query.parse::<Query>().unwrap()).is_err());
            }

            #[test]
            fn it_should_fail_if_the_downloaded_param_is_invalid() {
                assert!(parse_with_extra(("downloaded", "INVALID_DOWNLOADED_VALUE")).is_err());
            }

            #[test]
            fn it_should_fail_if_the_uploaded_param_is_invalid() {
                assert!(parse_with_extra(("uploaded", "INVALID_UPLOADED_VALUE")).is_err());
            }

            #[test]
            fn it_should_fail_if_the_left_param_is_invalid() {
                assert!(parse_with_extra(("left", "INVALID_LEFT_VALUE")).is_err());
            }

            #[test]
            fn it_should_fail_if_the_event_param_is_invalid() {
                assert!(parse_with_extra(("event", "INVALID_EVENT_VALUE")).is_err());
            }

            #[test]
            fn it_should_fail_if_the_compact_param_is_invalid() {
                assert!(parse_with_extra(("compact", "INVALID_COMPACT_VALUE")).is_err());
            }

            #[test]
            fn it_should_fail_if_the_numwant_param_is_invalid() {
                assert!(parse_with_extra(("numwant", "INVALID_NUMWANT_VALUE")).is_err());
            }

            #[test]
            fn it_should_fail_if_the_ip_param_is_invalid() {
                assert!(parse_with_extra(("ip", "INVALID_IP_VALUE")).is_err());
            }

            #[test]
            fn it_should_accept_a_bare_ipv6_ip_param() {
                let request = parse_with_extra(("ip", "2001:db8::1")).unwrap();

                assert_eq!(request.ip, Some("2001:db8::1".parse().unwrap()));
            }
        }
    }
}
