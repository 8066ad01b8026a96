//! The metadata REST API.
//!
//! Companion service of the HTTP tracker: publishers upsert torrent metadata
//! records and frontends list them together with the live swarm statistics
//! (seeders, leechers, completed downloads) read from the tracker.
//!
//! Endpoints:
//!
//! - `GET /api/v1/torrents[?repo_id=…]`
//! - `POST /api/v1/publish`
//! - `GET /health`
use std::sync::Arc;

use crate::core::catalog::Catalog;
use crate::core::Tracker;

pub mod routes;
pub mod server;
pub mod v1;

pub const API_LOG_TARGET: &str = "API";

/// Shared state for the API handlers: the tracker for live swarm statistics
/// and the catalog for the metadata records.
#[derive(Clone)]
pub struct ApiState {
    pub tracker: Arc<Tracker>,
    pub catalog: Arc<dyn Catalog>,
}
