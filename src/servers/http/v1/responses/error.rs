//! `Error` response for the HTTP tracker.
//!
//! From [BEP 03. The `BitTorrent` Protocol Specification](https://www.bittorrent.org/beps/bep_0003.html):
//!
//! _"Tracker responses are bencoded dictionaries. If a tracker response has a
//! key failure reason, then that maps to a human readable string which
//! explains why the query failed, and no other keys are required."_
//!
//! > **NOTICE**: error responses are bencoded and always have a `200 OK`
//! status code. The official `BitTorrent` specification does not specify the
//! status code.
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use hive_tracker_bencode::{ben_bytes, ben_map};

use crate::core;

/// `Error` response for the HTTP tracker.
#[derive(Debug, PartialEq, Eq)]
pub struct Error {
    /// Human readable string which explains why the request failed.
    pub failure_reason: String,
}

impl Error {
    /// Returns the bencoded representation of the `Error` struct.
    ///
    /// ```rust
    /// use hive_tracker::servers::http::v1::responses::error::Error;
    ///
    /// let err = Error {
    ///    failure_reason: "error message".to_owned(),
    /// };
    ///
    /// assert_eq!(err.write(), b"d14:failure reason13:error messagee");
    /// ```
    #[must_use]
    pub fn write(&self) -> Vec<u8> {
        (ben_map! {
            "failure reason" => ben_bytes!(self.failure_reason.clone())
        })
        .encode()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], self.write()).into_response()
    }
}

impl From<core::error::Error> for Error {
    fn from(err: core::error::Error) -> Self {
        let failure_reason = match err {
            core::error::Error::RateLimited { .. } => "rate limit".to_owned(),
            core::error::Error::PeerStore { source } => format!("Tracker error: {source}"),
        };

        Error { failure_reason }
    }
}
