//! Application jobs launchers.
//!
//! The main application setup has only two main stages:
//!
//! 1. Setup the domain layer: the tracker and the catalog.
//! 2. Start the application services as concurrent jobs.
//!
//! Every delivery service is wrapped inside a independent job (concurrent
//! task). The sweeper is a job too.
use std::net::SocketAddr;

pub mod http_tracker;
pub mod swarm_cleanup;
pub mod tracker_apis;

/// This is the message that the "launcher" spawned task sends to the main
/// application process to notify the service was successfully started.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Started {
    pub address: SocketAddr,
}
