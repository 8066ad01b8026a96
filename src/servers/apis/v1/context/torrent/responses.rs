//! API responses for the `torrent` API context.
use axum::response::{IntoResponse, Response};
use axum::Json;
use hive_tracker_primitives::info_hash::InfoHash;
use serde::Serialize;

use super::resources::TorrentWithStats;

/// Response body of `GET /api/v1/torrents`.
#[derive(Serialize, Debug)]
pub struct TorrentList {
    pub total: usize,
    pub data: Vec<TorrentWithStats>,
}

#[must_use]
pub fn torrent_list_response(torrents: Vec<TorrentWithStats>) -> Response {
    Json(TorrentList {
        total: torrents.len(),
        data: torrents,
    })
    .into_response()
}

/// Response body of `POST /api/v1/publish`.
#[derive(Serialize, Debug)]
pub struct Published {
    pub message: &'static str,
    pub info_hash: InfoHash,
}

#[must_use]
pub fn torrent_published_response(message: &'static str, info_hash: InfoHash) -> Response {
    Json(Published { message, info_hash }).into_response()
}
