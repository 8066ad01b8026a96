//! The torrent metadata catalog.
//!
//! The catalog is an external collaborator of the tracker: the metadata REST
//! API publishes and lists torrent records through this narrow put/list
//! interface. The tracker core never reads it.
use std::panic::Location;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hive_tracker_primitives::info_hash::InfoHash;

pub mod in_memory;

/// Errors returned by a catalog backend.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The backend could not be reached or answered out of protocol.
    #[error("catalog unavailable: {message} in {location}")]
    Unavailable {
        message: String,
        location: &'static Location<'static>,
    },
}

/// One published torrent record.
///
/// Records are keyed by `(repo_id, revision)`: publishing the same pair again
/// replaces the stored metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorrentMetadata {
    pub name: String,
    pub repo_id: String,
    pub revision: String,
    pub info_hash: InfoHash,
    pub total_size: i64,
    pub file_count: i64,
    pub piece_length: i64,
    pub magnet_link: String,
    /// Unix timestamp (seconds) of the first publication.
    pub created_at: u64,
}

/// Whether an upsert created a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Narrow put/list interface over the torrent metadata store.
#[async_trait]
pub trait Catalog: Sync + Send {
    /// Insert-or-replace the record keyed by `(repo_id, revision)`. The
    /// original `created_at` is preserved on replacement.
    async fn upsert(&self, metadata: TorrentMetadata) -> Result<UpsertOutcome, CatalogError>;

    /// All records, newest first, optionally filtered by `repo_id`.
    async fn list(&self, repo_id: Option<&str>) -> Result<Vec<TorrentMetadata>, CatalogError>;
}
