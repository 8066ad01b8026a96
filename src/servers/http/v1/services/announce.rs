//! The `announce` application service.
//!
//! Thin layer between the Axum handler and the domain
//! [`Tracker`](crate::core::Tracker) service: the handler owns the HTTP
//! concerns (query parsing, IP resolution, response format), this service
//! owns the call into the domain and the request logging.
use std::sync::Arc;

use hive_tracker_primitives::info_hash::InfoHash;
use tracing::debug;

use crate::core::{self, AnnounceData, Announcement, Tracker};
use crate::servers::http::HTTP_TRACKER_LOG_TARGET;

/// The `announce` service.
///
/// # Errors
///
/// Will return the [`Tracker`] errors verbatim: rate limiting and peer store
/// failures. The handler maps them into bencoded failure responses.
pub async fn invoke(
    tracker: Arc<Tracker>,
    info_hash: InfoHash,
    announcement: &Announcement,
) -> Result<AnnounceData, core::error::Error> {
    let announce_data = tracker.announce(&info_hash, announcement).await?;

    debug!(
        target: HTTP_TRACKER_LOG_TARGET,
        "announce {info_hash} from {}: {} peers returned, {} seeders / {} leechers",
        announcement.endpoint,
        announce_data.peers.len(),
        announce_data.stats.complete,
        announce_data.stats.incomplete
    );

    Ok(announce_data)
}
