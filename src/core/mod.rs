//! The core `tracker` module contains the generic `BitTorrent` tracker logic
//! which is independent of the delivery layer.
//!
//! ```text
//! Delivery layer     Domain layer
//!
//!      HTTP tracker |
//! Metadata REST API |> Core tracker
//! ```
//!
//! Handling announce requests is the most important task for a `BitTorrent`
//! tracker. A swarm is a network of peers that are all trying to download the
//! same torrent; when a peer wants to find other peers it announces itself to
//! the swarm via the tracker, and the tracker answers with a sample of other
//! swarm members plus the aggregate number of seeders (`complete`) and
//! leechers (`incomplete`).
//!
//! The announce pipeline is a state machine on the `event` request parameter:
//!
//! | Event                | Action                                                        |
//! |----------------------|---------------------------------------------------------------|
//! | `stopped`            | remove the peer; answer with an empty list and fresh counts   |
//! | `completed`          | count the download, then refresh like a regular announce      |
//! | `started` or absent  | refresh the peer entry and sample the swarm                   |
//!
//! All swarm state lives in the [`peer_store`]; the `Tracker` owns the store
//! and the announce policy and enforces the per-client-IP rate limit before
//! touching swarm state.
use std::panic::Location;

use derive_more::Constructor;
use hive_tracker_configuration::{AnnouncePolicy, Configuration, Core};
use hive_tracker_primitives::announce_event::AnnounceEvent;
use hive_tracker_primitives::info_hash::InfoHash;
use hive_tracker_primitives::peer::{Endpoint, Role};
use hive_tracker_primitives::swarm_metadata::SwarmMetadata;
use tracing::warn;

use self::error::Error;
use self::peer_store::in_memory::InMemoryPeerStore;
use self::peer_store::PeerStore;

pub mod catalog;
pub mod error;
pub mod peer_store;

/// The domain layer tracker service.
///
/// Its main responsibility is to handle announce requests, but it's also the
/// container for the announce policy and the peer store.
///
/// > **NOTICE**: the `Tracker` is not responsible for handling the network
/// > layer. It is used by higher application services that do.
pub struct Tracker {
    config: Core,
    store: Box<dyn PeerStore>,
}

/// One announce, after the delivery layer resolved the client endpoint and
/// clamped `numwant`.
#[derive(Clone, Copy, Debug, PartialEq, Constructor)]
pub struct Announcement {
    /// The endpoint the peer is reachable on. The peer identity inside the
    /// swarm.
    pub endpoint: Endpoint,
    /// Seeder if the peer reported `left == 0`.
    pub role: Role,
    pub event: AnnounceEvent,
    /// Maximum number of peers the client wants back, already clamped.
    pub numwant: usize,
}

/// Structure that holds the data returned by the `announce` request.
#[derive(Clone, Debug, PartialEq, Constructor, Default)]
pub struct AnnounceData {
    /// The list of peers that are downloading the same torrent.
    /// It excludes the peer that made the request.
    pub peers: Vec<Endpoint>,
    /// Swarm statistics.
    pub stats: SwarmMetadata,
    pub policy: AnnouncePolicy,
}

impl Tracker {
    /// `Tracker` constructor.
    #[must_use]
    pub fn new(config: &Configuration) -> Tracker {
        Tracker {
            config: config.core.clone(),
            store: Box::new(InMemoryPeerStore::new(config.core.peer_ttl)),
        }
    }

    #[must_use]
    pub fn get_announce_policy(&self) -> AnnouncePolicy {
        self.config.announce_policy
    }

    /// Applies the configured default when the client did not send `numwant`
    /// and caps the result.
    #[must_use]
    pub fn clamp_numwant(&self, requested: Option<u16>) -> usize {
        let numwant = requested.unwrap_or(self.config.numwant_default);
        usize::from(numwant.min(self.config.numwant_max))
    }

    /// It handles an announce request.
    ///
    /// BEP 03: [The `BitTorrent` Protocol Specification](https://www.bittorrent.org/beps/bep_0003.html).
    ///
    /// # Errors
    ///
    /// Will return [`Error::RateLimited`] if the client IP exceeded the
    /// announce rate limit (the store was not touched), or a
    /// [`Error::PeerStore`] if the peer store could not serve the request.
    pub async fn announce(&self, info_hash: &InfoHash, announcement: &Announcement) -> Result<AnnounceData, Error> {
        self.check_rate_limit(announcement).await?;

        match announcement.event {
            AnnounceEvent::Stopped => {
                // Non-fatal: the entry would expire by TTL anyway.
                if let Err(error) = self.store.remove_peer(info_hash, &announcement.endpoint).await {
                    warn!("failed to remove stopped peer {}: {error}", announcement.endpoint);
                }

                let stats = self.store.get_swarm_metadata(info_hash).await?;

                return Ok(AnnounceData::new(vec![], stats, self.get_announce_policy()));
            }
            AnnounceEvent::Completed => {
                // Non-fatal: availability of peer sampling matters more than
                // an exact download counter.
                if let Err(error) = self.store.increment_completed(info_hash).await {
                    warn!("failed to count completed download for {info_hash}: {error}");
                }
            }
            AnnounceEvent::Started | AnnounceEvent::None => {}
        }

        self.store
            .upsert_peer(info_hash, &announcement.endpoint, announcement.role)
            .await?;

        // Over-request by one so the caller can be dropped from its own
        // sample without shrinking the answer.
        let mut peers = self
            .store
            .sample_peers(info_hash, announcement.role, announcement.numwant + 1)
            .await?;
        peers.retain(|peer| peer != &announcement.endpoint);
        peers.truncate(announcement.numwant);

        let stats = self.store.get_swarm_metadata(info_hash).await?;

        Ok(AnnounceData::new(peers, stats, self.get_announce_policy()))
    }

    /// Swarm statistics for one torrent, as served to the metadata API.
    ///
    /// # Errors
    ///
    /// Will return an [`Error::PeerStore`] if the peer store could not serve
    /// the request.
    pub async fn get_swarm_metadata(&self, info_hash: &InfoHash) -> Result<SwarmMetadata, Error> {
        Ok(self.store.get_swarm_metadata(info_hash).await?)
    }

    /// Evicts expired peers across all active swarms and prunes the swarms
    /// whose both role sets drained. Called by the sweeper job.
    ///
    /// # Errors
    ///
    /// Will return an [`Error::PeerStore`] if the peer store could not serve
    /// the request.
    pub async fn cleanup_swarms(&self) -> Result<(), Error> {
        Ok(self.store.sweep().await?)
    }

    async fn check_rate_limit(&self, announcement: &Announcement) -> Result<(), Error> {
        let ip = announcement.endpoint.ip();
        let rate_limit = self.config.rate_limit;

        let allowed = self
            .store
            .check_rate_limit(&ip, rate_limit.window, rate_limit.max_requests)
            .await?;

        if !allowed {
            return Err(Error::RateLimited {
                ip,
                location: Location::caller(),
            });
        }

        Ok(())
    }
}
