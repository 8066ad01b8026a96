//! The `torrent` API context: listing published torrents with their live
//! swarm statistics, and publishing new metadata records.
pub mod forms;
pub mod handlers;
pub mod resources;
pub mod responses;
pub mod routes;
