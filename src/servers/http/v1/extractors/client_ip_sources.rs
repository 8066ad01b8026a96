//! Axum [`extractor`](axum::extract) to get the relevant information to
//! resolve the remote client IP.
//!
//! It's a wrapper for three sources, in the order the resolver consults them
//! (after the `ip` query param override):
//!
//! - The first (leftmost) IP in the `X-Forwarded-For` header, via the
//!   `axum-client-ip` extractor.
//! - The `X-Real-IP` header, via the `axum-client-ip` extractor.
//! - The IP of the transport connection, via axum's `ConnectInfo`.
use std::net::SocketAddr;

use axum::async_trait;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::response::Response;
use axum_client_ip::{LeftmostXForwardedFor, XRealIp};

use crate::servers::http::v1::services::peer_ip_resolver::ClientIpSources;

/// Extractor for the [`ClientIpSources`] struct.
pub struct Extract(pub ClientIpSources);

#[async_trait]
impl<S> FromRequestParts<S> for Extract
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let leftmost_x_forwarded_for = match LeftmostXForwardedFor::from_request_parts(parts, state).await {
            Ok(leftmost_x_forwarded_for) => Some(leftmost_x_forwarded_for.0),
            Err(_) => None,
        };

        let x_real_ip = match XRealIp::from_request_parts(parts, state).await {
            Ok(x_real_ip) => Some(x_real_ip.0),
            Err(_) => None,
        };

        let connection_info_ip = match ConnectInfo::<SocketAddr>::from_request_parts(parts, state).await {
            Ok(connection_info_socket_addr) => Some(connection_info_socket_addr.0.ip()),
            Err(_) => None,
        };

        Ok(Extract(ClientIpSources {
            leftmost_x_forwarded_for,
            x_real_ip,
            connection_info_ip,
        }))
    }
}
