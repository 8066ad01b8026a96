//! HTTP server routes for version `v1`.
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{announce, health_check};
use crate::core::Tracker;

/// It adds the routes to the router.
#[allow(clippy::needless_pass_by_value)]
pub fn router(tracker: Arc<Tracker>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check::handler))
        // Announce request
        .route("/announce", get(announce::handle).with_state(tracker))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
