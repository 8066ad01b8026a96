use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use hive_tracker_configuration::{Configuration, Threshold};

/// This configuration is used for testing. Both servers bind to an ephemeral
/// port on the loopback interface so concurrently running test trackers do
/// not collide.
#[must_use]
pub fn ephemeral() -> Configuration {
    let mut config = Configuration {
        // Change to `Threshold::Debug` for tests debugging
        log_threshold: Threshold::Off,
        ..Default::default()
    };

    config.http_tracker.bind_address = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
    config.http_api.bind_address = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);

    config
}

/// Ephemeral configuration with a rate limit low enough to trip in a test.
#[must_use]
pub fn ephemeral_with_rate_limit(max_requests: u32) -> Configuration {
    let mut config = ephemeral();

    config.core.rate_limit.max_requests = max_requests;

    config
}
