//! HTTP tracker API version `v1`.
pub mod extractors;
pub mod handlers;
pub mod query;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
