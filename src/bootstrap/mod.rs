//! Setup for the main tracker application.
//!
//! The [`app::setup`] function builds the configuration and the domain
//! tracker; the [`jobs`] submodules start the application services on top of
//! them.
pub mod app;
pub mod jobs;
pub mod logging;
