//! Primitive types for the `hive-tracker`.
//!
//! This module contains the basic data structures shared by all the tracker
//! layers: the torrent [`InfoHash`](info_hash::InfoHash), the peer
//! [`Endpoint`](peer::Endpoint) and its compact wire form ([`compact`]), the
//! announce [`AnnounceEvent`](announce_event::AnnounceEvent) and the swarm
//! statistics ([`swarm_metadata::SwarmMetadata`]).
use serde::{Deserialize, Serialize};

pub mod announce_event;
pub mod compact;
pub mod info_hash;
pub mod peer;
pub mod swarm_metadata;

/// Duration since the Unix Epoch. It's the timestamp format used for the peer
/// heartbeats kept by the peer store.
pub type DurationSinceUnixEpoch = std::time::Duration;

/// The number of bytes `downloaded`, `uploaded` or `left` reported by a peer
/// in an announce request.
pub type NumberOfBytes = i64;

/// IP version used by a peer: IPv4 or IPv6.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize, Hash)]
pub enum IPVersion {
    /// <https://en.wikipedia.org/wiki/Internet_Protocol_version_4>
    IPv4,
    /// <https://en.wikipedia.org/wiki/IPv6>
    IPv6,
}
