//! HTTP tracker job starter.
//!
//! The [`start_job`] function starts the HTTP tracker server and returns the
//! handle of the task running it. The server stops on the global shutdown
//! signal or when its halt channel fires.
use std::sync::Arc;

use hive_tracker_configuration::HttpTracker;
use tokio::task::JoinHandle;
use tracing::info;

use crate::core;
use crate::servers::http::server::{HttpServer, Launcher};
use crate::servers::http::HTTP_TRACKER_LOG_TARGET;

/// It starts the HTTP tracker server.
///
/// # Panics
///
/// It would panic if the server cannot bind its socket.
pub async fn start_job(config: &HttpTracker, tracker: Arc<core::Tracker>) -> JoinHandle<()> {
    let server = HttpServer::new(Launcher::new(config.bind_address))
        .start(tracker)
        .await
        .expect("it should be able to start the http tracker server");

    info!(target: HTTP_TRACKER_LOG_TARGET, "Bound to: http://{}", server.state.binding);

    tokio::spawn(async move {
        assert!(
            server.state.task.await.is_ok(),
            "the HTTP tracker server should not panic"
        );
    })
}
