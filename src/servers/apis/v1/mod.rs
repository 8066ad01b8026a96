//! The first version of the metadata REST API.
pub mod context;
pub mod responses;
pub mod routes;
