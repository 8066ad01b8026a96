//! Axum [`extractors`](axum::extract) for the HTTP tracker.
pub mod announce_request;
pub mod client_ip_sources;
