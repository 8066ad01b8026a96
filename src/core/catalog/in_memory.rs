//! In-memory catalog backend.
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{Catalog, CatalogError, TorrentMetadata, UpsertOutcome};

/// In-memory [`Catalog`] implementation, keyed by `(repo_id, revision)`.
#[derive(Default)]
pub struct InMemoryCatalog {
    records: RwLock<HashMap<(String, String), TorrentMetadata>>,
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn upsert(&self, metadata: TorrentMetadata) -> Result<UpsertOutcome, CatalogError> {
        let key = (metadata.repo_id.clone(), metadata.revision.clone());
        let mut records = self.records.write().expect("unable to get writable catalog");

        match records.get_mut(&key) {
            Some(existing) => {
                let created_at = existing.created_at;
                *existing = TorrentMetadata { created_at, ..metadata };
                Ok(UpsertOutcome::Updated)
            }
            None => {
                records.insert(key, metadata);
                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn list(&self, repo_id: Option<&str>) -> Result<Vec<TorrentMetadata>, CatalogError> {
        let records = self.records.read().expect("unable to get catalog");

        let mut entries: Vec<TorrentMetadata> = records
            .values()
            .filter(|metadata| repo_id.map_or(true, |repo_id| metadata.repo_id == repo_id))
            .cloned()
            .collect();

        // Newest first; ties broken by repo id to keep the order stable.
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.repo_id.cmp(&b.repo_id)));

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use hive_tracker_primitives::info_hash::InfoHash;

    use super::InMemoryCatalog;
    use crate::core::catalog::{Catalog, TorrentMetadata, UpsertOutcome};

    fn sample_metadata(repo_id: &str, revision: &str, created_at: u64) -> TorrentMetadata {
        TorrentMetadata {
            name: format!("{repo_id}@{revision}"),
            repo_id: repo_id.to_owned(),
            revision: revision.to_owned(),
            info_hash: InfoHash::from_str("3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0").unwrap(),
            total_size: 1024,
            file_count: 2,
            piece_length: 256,
            magnet_link: "magnet:?xt=urn:btih:3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0".to_owned(),
            created_at,
        }
    }

    #[tokio::test]
    async fn publishing_a_new_repo_revision_pair_should_create_a_record() {
        let catalog = InMemoryCatalog::default();

        let outcome = catalog.upsert(sample_metadata("org/model", "main", 100)).await.unwrap();

        assert_eq!(outcome, UpsertOutcome::Created);
        assert_eq!(catalog.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn republishing_the_same_pair_should_replace_the_record_keeping_created_at() {
        let catalog = InMemoryCatalog::default();

        catalog.upsert(sample_metadata("org/model", "main", 100)).await.unwrap();

        let mut replacement = sample_metadata("org/model", "main", 999);
        replacement.total_size = 2048;
        let outcome = catalog.upsert(replacement).await.unwrap();

        assert_eq!(outcome, UpsertOutcome::Updated);

        let records = catalog.list(None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_size, 2048);
        assert_eq!(records[0].created_at, 100);
    }

    #[tokio::test]
    async fn listing_should_filter_by_repo_id_and_return_newest_first() {
        let catalog = InMemoryCatalog::default();

        catalog.upsert(sample_metadata("org/first", "main", 100)).await.unwrap();
        catalog.upsert(sample_metadata("org/second", "main", 200)).await.unwrap();
        catalog.upsert(sample_metadata("org/first", "v2", 300)).await.unwrap();

        let all = catalog.list(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].created_at, 300);
        assert_eq!(all[1].created_at, 200);

        let filtered = catalog.list(Some("org/first")).await.unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|metadata| metadata.repo_id == "org/first"));
    }
}
