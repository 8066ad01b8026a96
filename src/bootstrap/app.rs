//! Setup for the tracker application.
//!
//! It loads the configuration from the environment and builds the domain
//! tracker service.
use std::sync::Arc;

use hive_tracker_configuration::Configuration;

use crate::bootstrap;
use crate::core::Tracker;

/// # Panics
///
/// Will panic if it can't load the configuration from the environment.
#[must_use]
pub fn setup() -> (Configuration, Arc<Tracker>) {
    let config = match Configuration::load_from_env() {
        Ok(config) => config,
        Err(error) => {
            panic!("{error}")
        }
    };

    bootstrap::logging::setup(&config);

    let tracker = initialize_with_configuration(&config);

    (config, tracker)
}

/// # Panics
///
/// Will panic if the tracker cannot be instantiated.
#[must_use]
pub fn initialize_with_configuration(configuration: &Configuration) -> Arc<Tracker> {
    Arc::new(Tracker::new(configuration))
}
