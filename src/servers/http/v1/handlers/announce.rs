//! Axum [`handler`](axum::handler) for the `announce` request.
//!
//! It resolves the client endpoint, dispatches the announce into the domain
//! layer and serializes the response in the format the client asked for.
use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use hive_tracker_primitives::announce_event::AnnounceEvent;
use hive_tracker_primitives::peer::{Endpoint, Role};
use tracing::debug;

use crate::core::{AnnounceData, Announcement, Tracker};
use crate::servers::http::v1::extractors::announce_request::ExtractRequest;
use crate::servers::http::v1::extractors::client_ip_sources::Extract as ExtractClientIpSources;
use crate::servers::http::v1::requests::announce::{Announce, Compact, Event};
use crate::servers::http::v1::responses::{self, announce};
use crate::servers::http::v1::services::peer_ip_resolver::ClientIpSources;
use crate::servers::http::v1::services::{self, peer_ip_resolver};
use crate::servers::http::HTTP_TRACKER_LOG_TARGET;

/// It handles the `announce` request.
#[allow(clippy::unused_async)]
pub async fn handle(
    State(tracker): State<Arc<Tracker>>,
    ExtractRequest(announce_request): ExtractRequest,
    ExtractClientIpSources(client_ip_sources): ExtractClientIpSources,
) -> Response {
    debug!(target: HTTP_TRACKER_LOG_TARGET, "http announce request: {:#?}", announce_request);

    let announce_data = match handle_announce(&tracker, &announce_request, &client_ip_sources).await {
        Ok(announce_data) => announce_data,
        Err(error) => return error.into_response(),
    };

    build_response(&announce_request, announce_data)
}

async fn handle_announce(
    tracker: &Arc<Tracker>,
    announce_request: &Announce,
    client_ip_sources: &ClientIpSources,
) -> Result<AnnounceData, responses::error::Error> {
    let peer_ip = match peer_ip_resolver::invoke(announce_request.ip, client_ip_sources) {
        Ok(peer_ip) => peer_ip,
        Err(error) => return Err(responses::error::Error::from(error)),
    };

    let announcement = announcement_from_request(tracker, announce_request, peer_ip);

    let announce_data = services::announce::invoke(tracker.clone(), announce_request.info_hash, &announcement)
        .await
        .map_err(responses::error::Error::from)?;

    Ok(announce_data)
}

fn build_response(announce_request: &Announce, announce_data: AnnounceData) -> Response {
    match &announce_request.compact {
        Some(Compact::Accepted) => announce::Compact::from(announce_data).into_response(),
        // Default response format non compact
        Some(Compact::NotAccepted) | None => announce::NonCompact::from(announce_data).into_response(),
    }
}

/// It ignores the port in the request URL authority; the peer endpoint is
/// always `(resolved client IP, port param)`.
#[must_use]
fn announcement_from_request(tracker: &Tracker, announce_request: &Announce, peer_ip: std::net::IpAddr) -> Announcement {
    Announcement {
        endpoint: Endpoint::new(peer_ip, announce_request.port),
        role: Role::from_bytes_left(announce_request.left.unwrap_or(0)),
        event: map_event(announce_request.event.as_ref()),
        numwant: tracker.clamp_numwant(announce_request.numwant),
    }
}

fn map_event(event: Option<&Event>) -> AnnounceEvent {
    match event {
        Some(Event::Started) => AnnounceEvent::Started,
        Some(Event::Stopped) => AnnounceEvent::Stopped,
        Some(Event::Completed) => AnnounceEvent::Completed,
        None => AnnounceEvent::None,
    }
}

#[cfg(test)]
mod tests {
    use std::net::IpAddr;
    use std::str::FromStr;
    use std::sync::Arc;
    use std::time::Duration;

    use hive_tracker_clock::Stopped;
    use hive_tracker_primitives::info_hash::InfoHash;
    use hive_tracker_primitives::peer;
    use hive_tracker_test_helpers::configuration;

    use super::handle_announce;
    use crate::core::Tracker;
    use crate::servers::http::v1::requests::announce::Announce;
    use crate::servers::http::v1::responses;
    use crate::servers::http::v1::services::peer_ip_resolver::ClientIpSources;

    fn public_tracker() -> Arc<Tracker> {
        Stopped::local_set(&Duration::from_secs(1_669_397_478));
        Arc::new(Tracker::new(&configuration::ephemeral()))
    }

    fn rate_limited_tracker() -> Arc<Tracker> {
        Stopped::local_set(&Duration::from_secs(1_669_397_478));
        Arc::new(Tracker::new(&configuration::ephemeral_with_rate_limit(1)))
    }

    fn sample_announce_request() -> Announce {
        Announce {
            info_hash: "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0".parse::<InfoHash>().unwrap(),
            peer_id: peer::Id(*b"-qB00000000000000001"),
            port: 17548,
            downloaded: None,
            uploaded: None,
            left: None,
            event: None,
            compact: None,
            numwant: None,
            ip: None,
        }
    }

    fn sample_client_ip_sources() -> ClientIpSources {
        ClientIpSources {
            leftmost_x_forwarded_for: None,
            x_real_ip: None,
            connection_info_ip: Some(IpAddr::from_str("126.0.0.1").unwrap()),
        }
    }

    fn assert_error_response(error: &responses::error::Error, error_message: &str) {
        assert!(
            error.failure_reason.contains(error_message),
            "Error response does not contain message: '{error_message}'. Error: {error:?}"
        );
    }

    #[tokio::test]
    async fn it_should_answer_an_announce_with_the_swarm_stats() {
        let tracker = public_tracker();

        let announce_data = handle_announce(&tracker, &sample_announce_request(), &sample_client_ip_sources())
            .await
            .unwrap();

        // `left` is absent, so the peer counts as a leecher.
        assert_eq!(announce_data.stats.incomplete, 1);
        assert!(announce_data.peers.is_empty());
    }

    #[tokio::test]
    async fn it_should_fail_when_the_client_ip_cannot_be_resolved() {
        let tracker = public_tracker();

        let client_ip_sources = ClientIpSources {
            leftmost_x_forwarded_for: None,
            x_real_ip: None,
            connection_info_ip: None,
        };

        let response = handle_announce(&tracker, &sample_announce_request(), &client_ip_sources)
            .await
            .unwrap_err();

        assert_error_response(&response, "cannot get the client IP from the request");
    }

    #[tokio::test]
    async fn it_should_fail_with_the_rate_limit_reason_when_a_client_announces_too_often() {
        let tracker = rate_limited_tracker();

        handle_announce(&tracker, &sample_announce_request(), &sample_client_ip_sources())
            .await
            .unwrap();

        let response = handle_announce(&tracker, &sample_announce_request(), &sample_client_ip_sources())
            .await
            .unwrap_err();

        assert_error_response(&response, "rate limit");
    }
}
