//! Responses sent by the HTTP tracker. They are always bencoded.
pub mod announce;
pub mod error;
