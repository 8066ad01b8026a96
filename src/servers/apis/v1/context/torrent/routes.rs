//! Routes for the `torrent` API context.
use axum::routing::{get, post};
use axum::Router;

use super::handlers::{list_torrents_handler, publish_torrent_handler};
use crate::servers::apis::ApiState;

/// Add the routes of the context to the router.
pub fn add(prefix: &str, router: Router, state: ApiState) -> Router {
    router
        .route(&format!("{prefix}/torrents"), get(list_torrents_handler).with_state(state.clone()))
        .route(&format!("{prefix}/publish"), post(publish_torrent_handler).with_state(state))
}
