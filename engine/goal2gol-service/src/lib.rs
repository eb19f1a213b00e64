//! Goal2Gol Service Library
//!
//! Configuration loading, logging setup, component wiring and graceful
//! shutdown for the `goal2gol` binary.

use anyhow::{Context, Result};
use std::path::Path;

pub mod config;
pub mod logging;
pub mod service;
pub mod signals;

pub use config::ServiceConfig;
pub use logging::initialize_logging;
pub use service::{summarize, Goal2GolService, HealthSummary};
pub use signals::setup_signal_handlers;

/// Load configuration from files and environment variables
pub fn load_configuration(path: Option<&Path>) -> Result<ServiceConfig> {
    config::load_config(path).context("Failed to load service configuration")
}
