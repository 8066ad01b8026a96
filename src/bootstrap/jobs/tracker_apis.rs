//! Metadata API job starter.
//!
//! The [`start_job`] function starts the metadata REST API server and returns
//! the handle of the task running it.
use hive_tracker_configuration::HttpApi;
use tokio::task::JoinHandle;
use tracing::info;

use crate::servers::apis::server::{ApiServer, Launcher};
use crate::servers::apis::{ApiState, API_LOG_TARGET};

/// It starts the metadata API server.
///
/// # Panics
///
/// It would panic if the server cannot bind its socket.
pub async fn start_job(config: &HttpApi, state: ApiState) -> JoinHandle<()> {
    let server = ApiServer::new(Launcher::new(config.bind_address))
        .start(state)
        .await
        .expect("it should be able to start the metadata API server");

    info!(target: API_LOG_TARGET, "Bound to: http://{}", server.state.binding);

    tokio::spawn(async move {
        assert!(server.state.task.await.is_ok(), "the metadata API server should not panic");
    })
}
