//! Route initialization for the v1 API.
use axum::Router;

use super::context::torrent;
use crate::servers::apis::ApiState;

/// Add the routes for the v1 API contexts.
pub fn add(router: Router, state: ApiState) -> Router {
    torrent::routes::add("/api/v1", router, state)
}
