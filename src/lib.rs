//! `hive-tracker` is a `BitTorrent` tracker: a coordination service that
//! helps peers swarming around a content fingerprint (`info_hash`) discover
//! each other.
//!
//! Clients periodically announce their presence over HTTP and the tracker
//! replies with a sample of other peers currently swarming the same content,
//! plus aggregate counts of seeders and leechers. A companion REST API serves
//! the published torrent metadata next to live swarm statistics.
//!
//! ```text
//! Delivery layer     Domain layer
//!
//!     HTTP tracker |
//! Metadata REST API |> Core tracker
//! ```
//!
//! The layers are:
//!
//! - [`servers`]: the delivery services (HTTP tracker and metadata API).
//! - [`core`]: the domain layer with the announce pipeline and the peer store.
//! - [`bootstrap`] and [`app`]: setup and job orchestration.
pub mod app;
pub mod bootstrap;
pub mod core;
pub mod servers;

/// The clock heartbeats and TTL cutoffs are read from: the system clock in
/// production, the settable fixed clock when testing so expiry can be driven
/// by the tests.
#[cfg(not(test))]
pub(crate) type CurrentClock = hive_tracker_clock::Working;

#[cfg(test)]
pub(crate) type CurrentClock = hive_tracker_clock::Stopped;
