//! Logging bootstrap
//!
//! Installs a `tracing_subscriber` fmt subscriber. `RUST_LOG` takes precedence
//! over the configured level.

use crate::config::LoggingConfig;
use crate::utils::error::{Result, RoutewiseError};
use tracing_subscriber::EnvFilter;

/// Build the env filter for a logging configuration
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level).map_err(|e| {
        RoutewiseError::logging(format!("Invalid log filter '{}': {}", config.level, e))
    })
}

/// Initialize the global tracing subscriber
///
/// Safe to call more than once: a subscriber that is already installed is
/// left in place and `Ok(false)` is returned.
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;

    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(config.with_target)
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.with_target)
            .with_thread_ids(false)
            .try_init()
            .is_ok()
    };

    Ok(installed)
}
