//! Tracker application.
//!
//! The application is a container for the services it runs as concurrent
//! jobs:
//!
//! - The HTTP tracker.
//! - The metadata REST API.
//! - The swarm sweeper: it evicts expired peers and prunes empty swarms.
//!
//! All jobs watch the global shutdown signal; the caller joins the returned
//! handles to wait for a clean exit.
use std::sync::Arc;

use hive_tracker_configuration::Configuration;
use tokio::task::JoinHandle;

use crate::bootstrap::jobs::{http_tracker, swarm_cleanup, tracker_apis};
use crate::core::catalog::in_memory::InMemoryCatalog;
use crate::core::catalog::Catalog;
use crate::core::Tracker;
use crate::servers::apis::ApiState;

/// It starts all the application jobs.
pub async fn start(config: &Configuration, tracker: Arc<Tracker>) -> Vec<JoinHandle<()>> {
    let mut jobs: Vec<JoinHandle<()>> = Vec::new();

    let catalog: Arc<dyn Catalog> = Arc::new(InMemoryCatalog::default());

    // Start the HTTP tracker
    jobs.push(http_tracker::start_job(&config.http_tracker, tracker.clone()).await);

    // Start the metadata REST API
    jobs.push(
        tracker_apis::start_job(
            &config.http_api,
            ApiState {
                tracker: tracker.clone(),
                catalog,
            },
        )
        .await,
    );

    // Start the swarm sweeper
    jobs.push(swarm_cleanup::start_job(&config.core, &tracker));

    jobs
}
