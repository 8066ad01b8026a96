//! API handlers for the `torrent` API context.
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use hive_tracker_clock::Time;
use serde::Deserialize;
use tracing::warn;

use super::forms::PublishForm;
use super::resources::{Stats, TorrentWithStats};
use super::responses::{torrent_list_response, torrent_published_response};
use crate::core::catalog::UpsertOutcome;
use crate::servers::apis::v1::responses::{invalid_form_response, unhandled_rejection_response};
use crate::servers::apis::{ApiState, API_LOG_TARGET};
use crate::CurrentClock;

/// A container for the URL query parameters of `GET /api/v1/torrents`.
#[derive(Deserialize, Debug)]
pub struct ListParams {
    /// When present, only the records published under this repository are
    /// returned.
    pub repo_id: Option<String>,
}

/// It handles the request to list the published torrents with their live
/// swarm statistics.
///
/// It returns a `200` response with a json
/// [`TorrentList`](super::responses::TorrentList).
pub async fn list_torrents_handler(State(state): State<ApiState>, Query(params): Query<ListParams>) -> Response {
    let torrents = match state.catalog.list(params.repo_id.as_deref()).await {
        Ok(torrents) => torrents,
        Err(error) => return unhandled_rejection_response(format!("failed to fetch torrents: {error}")),
    };

    let mut results: Vec<TorrentWithStats> = Vec::with_capacity(torrents.len());

    for torrent in torrents {
        // A record whose stats cannot be read is skipped, not fatal.
        match state.tracker.get_swarm_metadata(&torrent.info_hash).await {
            Ok(stats) => results.push(TorrentWithStats {
                torrent,
                stats: Stats::from(stats),
            }),
            Err(error) => {
                warn!(target: API_LOG_TARGET, "failed to get stats for {}: {error}", torrent.info_hash);
            }
        }
    }

    torrent_list_response(results)
}

/// It handles the request to publish torrent metadata, upserting by
/// `(repo_id, revision)`.
///
/// It returns:
///
/// - `200` with the upsert outcome message.
/// - `400` when `name` or `repo_id` are empty.
pub async fn publish_torrent_handler(State(state): State<ApiState>, Json(form): Json<PublishForm>) -> Response {
    if form.name.is_empty() || form.repo_id.is_empty() {
        return invalid_form_response("name and repo_id are required");
    }

    let info_hash = form.info_hash;
    let metadata = form.into_metadata(CurrentClock::now().as_secs());

    match state.catalog.upsert(metadata).await {
        Ok(UpsertOutcome::Created) => torrent_published_response("torrent metadata created", info_hash),
        Ok(UpsertOutcome::Updated) => torrent_published_response("torrent metadata updated", info_hash),
        Err(error) => unhandled_rejection_response(format!("failed to save torrent metadata: {error}")),
    }
}
