//! Job that runs a task on intervals to sweep the peer store.
//!
//! It evicts peers whose heartbeat is older than the peer TTL and prunes
//! swarms whose both role sets drained. An entry refreshed during the sweep
//! survives; a swarm that becomes non-empty right after its cardinality check
//! is picked up again on the next pass.
use std::sync::Arc;
use std::time::Instant;

use hive_tracker_configuration::Core;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::core;

pub const SWEEPER_LOG_TARGET: &str = "SWEEPER";

/// It starts a job for sweeping expired peer data in the tracker.
///
/// The sweeping task is executed on a `sweep_interval`.
#[must_use]
pub fn start_job(config: &Core, tracker: &Arc<core::Tracker>) -> JoinHandle<()> {
    let weak_tracker = std::sync::Arc::downgrade(tracker);
    let interval = config.sweep_interval;

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(interval);
        interval.tick().await;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!(target: SWEEPER_LOG_TARGET, "Stopping swarm cleanup job..");
                    break;
                }
                _ = interval.tick() => {
                    if let Some(tracker) = weak_tracker.upgrade() {
                        let started_at = Instant::now();
                        info!(target: SWEEPER_LOG_TARGET, "Sweeping expired peers..");
                        if let Err(err) = tracker.cleanup_swarms().await {
                            error!(target: SWEEPER_LOG_TARGET, "Sweep failed: {err}");
                        } else {
                            info!(target: SWEEPER_LOG_TARGET, "Swept expired peers in: {}ms", started_at.elapsed().as_millis());
                        }
                    } else {
                        break;
                    }
                }
            }
        }
    })
}
