//! Helpers shared by the `hive-tracker` test suites.
pub mod configuration;
