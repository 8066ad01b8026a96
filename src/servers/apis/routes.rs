//! API routes.
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::v1;
use super::ApiState;
use crate::servers::http::v1::handlers::health_check;

/// Add the routes for all the API versions plus the CORS layer the web
/// frontends need (any origin, `GET`/`POST`/`OPTIONS`).
pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let router = Router::new().route("/health", get(health_check::handler));

    v1::routes::add(router, state).layer(cors).layer(TraceLayer::new_for_http())
}
