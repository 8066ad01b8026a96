//! Requests handled by the HTTP tracker.
pub mod announce;
