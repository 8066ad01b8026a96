//! Delivery services: the HTTP tracker and the metadata REST API.
pub mod apis;
pub mod http;
pub mod signals;
