//! The peer store: the only shared mutable state of the tracker.
//!
//! It keeps, per swarm, two disjoint role sets (seeders and leechers) whose
//! entries are scored by the last heartbeat timestamp, a monotonically
//! non-decreasing completed-downloads counter with an idleness TTL, and the
//! per-client-IP rate counters.
//!
//! The trait mirrors a keyed data plane, so every operation is potentially
//! I/O-bound and async. Implementations must make each operation atomic with
//! respect to other operations on the same swarm; in particular
//! [`PeerStore::upsert_peer`] applies the opposite-set removal and the
//! current-set insertion as one observable step, so no reader ever sees a
//! peer in both sets.
use std::net::IpAddr;
use std::panic::Location;
use std::time::Duration;

use async_trait::async_trait;
use hive_tracker_primitives::info_hash::InfoHash;
use hive_tracker_primitives::peer::{Endpoint, Role};
use hive_tracker_primitives::swarm_metadata::SwarmMetadata;
use thiserror::Error;

pub mod in_memory;

/// Share of seeders in the sample returned to a leecher. The rest of the
/// quota is filled with other leechers; deficits on either side backfill from
/// the other.
pub const SEEDER_SAMPLE_RATIO: f64 = 0.3;

/// Errors returned by a peer store backend.
#[derive(Error, Debug)]
pub enum Error {
    /// The backend could not be reached or answered out of protocol.
    #[error("peer store unavailable: {message} in {location}")]
    Unavailable {
        message: String,
        location: &'static Location<'static>,
    },
}

/// The peer store operations used by the announce pipeline and the sweeper.
#[async_trait]
pub trait PeerStore: Sync + Send {
    /// Insert-or-refresh `endpoint` in the `role` set of the swarm with
    /// score = now, removing it from the opposite set in the same step, and
    /// mark the swarm active.
    async fn upsert_peer(&self, info_hash: &InfoHash, endpoint: &Endpoint, role: Role) -> Result<(), Error>;

    /// Delete `endpoint` from both role sets. Idempotent.
    async fn remove_peer(&self, info_hash: &InfoHash, endpoint: &Endpoint) -> Result<(), Error>;

    /// Swarm statistics derived from the live set cardinalities, implicitly
    /// dropping entries older than the peer TTL.
    async fn get_swarm_metadata(&self, info_hash: &InfoHash) -> Result<SwarmMetadata, Error>;

    /// Up to `max` random live endpoints, mixed according to the caller's
    /// role: a seeder gets leechers only; a leecher gets a 30/70
    /// seeder/leecher mix with backfill from the longer side. The returned
    /// order is arbitrary.
    async fn sample_peers(&self, info_hash: &InfoHash, role: Role, max: usize) -> Result<Vec<Endpoint>, Error>;

    /// `completed += 1` for the swarm and refresh the counter idleness TTL.
    async fn increment_completed(&self, info_hash: &InfoHash) -> Result<(), Error>;

    /// Count one request from `client_ip` against the sliding window.
    /// Returns `false` when the request exceeds `max_requests`.
    async fn check_rate_limit(&self, client_ip: &IpAddr, window: Duration, max_requests: u32) -> Result<bool, Error>;

    /// Evict entries whose heartbeat expired across all active swarms and
    /// drop swarms whose both sets drained. Also decays idle completed
    /// counters and stale rate counters.
    async fn sweep(&self) -> Result<(), Error>;
}
