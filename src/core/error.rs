//! Errors returned by the core tracker.
use std::net::IpAddr;
use std::panic::Location;

use thiserror::Error;

use crate::core::peer_store;

/// Announce pipeline errors. They are mapped into bencoded `failure reason`
/// responses at the delivery layer; the HTTP status stays `200 OK` either way.
#[derive(Error, Debug)]
pub enum Error {
    /// The per-IP announce counter was exceeded. The store was not touched.
    #[error("rate limit exceeded for client {ip} in {location}")]
    RateLimited {
        ip: IpAddr,
        location: &'static Location<'static>,
    },

    /// The peer store could not serve the request. The request counts as
    /// dropped; the tracker does not retry.
    #[error("peer store failure: {source}")]
    PeerStore {
        #[from]
        source: peer_store::Error,
    },
}
