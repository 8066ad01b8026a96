//! Helpers shared by the integration test suites: they boot real servers on
//! an ephemeral port and drive them over the loopback interface.
use std::net::SocketAddr;
use std::sync::Arc;

use hive_tracker::core::catalog::in_memory::InMemoryCatalog;
use hive_tracker::core::Tracker;
use hive_tracker::servers::apis::server::{ApiServer, Launcher as ApiLauncher, RunningApiServer};
use hive_tracker::servers::apis::ApiState;
use hive_tracker::servers::http::server::{HttpServer, Launcher, RunningHttpServer};
use hive_tracker_configuration::Configuration;

pub struct RunningTracker {
    pub tracker: Arc<Tracker>,
    pub server: RunningHttpServer,
}

impl RunningTracker {
    pub fn bind_address(&self) -> SocketAddr {
        self.server.state.binding
    }
}

/// Starts an HTTP tracker with the given configuration on an ephemeral port.
pub async fn start_http_tracker(configuration: &Configuration) -> RunningTracker {
    let tracker = Arc::new(Tracker::new(configuration));

    let server = HttpServer::new(Launcher::new(configuration.http_tracker.bind_address))
        .start(tracker.clone())
        .await
        .expect("it should start the http tracker server");

    RunningTracker { tracker, server }
}

pub struct RunningApi {
    pub tracker: Arc<Tracker>,
    pub server: RunningApiServer,
}

impl RunningApi {
    pub fn bind_address(&self) -> SocketAddr {
        self.server.state.binding
    }
}

/// Starts a metadata API server backed by a fresh tracker and an in-memory
/// catalog, on an ephemeral port.
pub async fn start_api(configuration: &Configuration) -> RunningApi {
    let tracker = Arc::new(Tracker::new(configuration));

    let state = ApiState {
        tracker: tracker.clone(),
        catalog: Arc::new(InMemoryCatalog::default()),
    };

    let server = ApiServer::new(ApiLauncher::new(configuration.http_api.bind_address))
        .start(state)
        .await
        .expect("it should start the metadata API server");

    RunningApi { tracker, server }
}
