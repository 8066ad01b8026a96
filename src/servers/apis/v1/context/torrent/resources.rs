//! API resources for the `torrent` API context.
use hive_tracker_primitives::swarm_metadata::SwarmMetadata;
use serde::Serialize;

use crate::core::catalog::TorrentMetadata;

/// One published torrent together with its live swarm statistics.
#[derive(Serialize, Debug, PartialEq)]
pub struct TorrentWithStats {
    #[serde(flatten)]
    pub torrent: TorrentMetadata,
    pub stats: Stats,
}

/// Live swarm statistics, read from the peer store.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Stats {
    pub seeders: u32,
    pub leechers: u32,
    pub completed: u32,
}

impl From<SwarmMetadata> for Stats {
    fn from(stats: SwarmMetadata) -> Self {
        Self {
            seeders: stats.complete,
            leechers: stats.incomplete,
            completed: stats.downloaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use hive_tracker_primitives::info_hash::InfoHash;
    use hive_tracker_primitives::swarm_metadata::SwarmMetadata;

    use super::{Stats, TorrentWithStats};
    use crate::core::catalog::TorrentMetadata;

    #[test]
    fn it_should_be_serialized_with_the_metadata_fields_flattened() {
        let resource = TorrentWithStats {
            torrent: TorrentMetadata {
                name: "model weights".to_owned(),
                repo_id: "org/model".to_owned(),
                revision: "main".to_owned(),
                info_hash: InfoHash::from_str("3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0").unwrap(),
                total_size: 1024,
                file_count: 2,
                piece_length: 256,
                magnet_link: "magnet:?xt=urn:btih:3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0".to_owned(),
                created_at: 1_669_397_478,
            },
            stats: Stats::from(SwarmMetadata {
                downloaded: 5,
                complete: 3,
                incomplete: 2,
            }),
        };

        let json = serde_json::to_value(&resource).unwrap();

        assert_eq!(json["repo_id"], "org/model");
        assert_eq!(json["info_hash"], "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0");
        assert_eq!(json["stats"]["seeders"], 3);
        assert_eq!(json["stats"]["leechers"], 2);
        assert_eq!(json["stats"]["completed"], 5);
    }
}
