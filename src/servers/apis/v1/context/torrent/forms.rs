//! Forms for the `torrent` API context.
use hive_tracker_primitives::info_hash::InfoHash;
use serde::Deserialize;

use crate::core::catalog::TorrentMetadata;

/// Request body of `POST /api/v1/publish`.
///
/// Records are keyed by `(repo_id, revision)`; publishing the same pair twice
/// replaces the stored metadata.
#[derive(Deserialize, Debug)]
pub struct PublishForm {
    pub name: String,
    pub repo_id: String,
    #[serde(default = "default_revision")]
    pub revision: String,
    pub info_hash: InfoHash,
    #[serde(default)]
    pub total_size: i64,
    #[serde(default)]
    pub file_count: i64,
    #[serde(default)]
    pub piece_length: i64,
    #[serde(default)]
    pub magnet_link: String,
}

fn default_revision() -> String {
    "main".to_owned()
}

impl PublishForm {
    #[must_use]
    pub fn into_metadata(self, created_at: u64) -> TorrentMetadata {
        TorrentMetadata {
            name: self.name,
            repo_id: self.repo_id,
            revision: self.revision,
            info_hash: self.info_hash,
            total_size: self.total_size,
            file_count: self.file_count,
            piece_length: self.piece_length,
            magnet_link: self.magnet_link,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PublishForm;

    #[test]
    fn it_should_be_deserialized_from_the_publish_request_body() {
        let form: PublishForm = serde_json::from_str(
            r#"{
                "name": "model weights",
                "repo_id": "org/model",
                "revision": "v2",
                "info_hash": "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0",
                "total_size": 1024,
                "file_count": 2,
                "piece_length": 256,
                "magnet_link": "magnet:?xt=urn:btih:3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0"
            }"#,
        )
        .unwrap();

        assert_eq!(form.revision, "v2");
        assert_eq!(form.total_size, 1024);
    }

    #[test]
    fn the_revision_should_default_to_main() {
        let form: PublishForm = serde_json::from_str(
            r#"{
                "name": "model weights",
                "repo_id": "org/model",
                "info_hash": "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0"
            }"#,
        )
        .unwrap();

        assert_eq!(form.revision, "main");
    }
}
