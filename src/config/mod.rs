//! Configuration management for the router
//!
//! This module handles loading, validation, and environment overrides of the
//! provider catalogue and the global routing flags.

pub mod models;

pub use models::*;

use crate::utils::error::{Result, RoutewiseError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::Path;
use tracing::{debug, info, warn};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider catalogue, in preference order
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// Global routing flags
    #[serde(default)]
    pub routing: RoutingSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;

        let config = Self::from_yaml_str(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ROUTEWISE_*` environment overrides on top of the loaded values
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Ok(value) = env::var("ROUTEWISE_FALLBACK_ENABLED") {
            self.routing.fallback_enabled = parse_env("ROUTEWISE_FALLBACK_ENABLED", &value)?;
        }
        if let Ok(value) = env::var("ROUTEWISE_CACHING_ENABLED") {
            self.routing.caching_enabled = parse_env("ROUTEWISE_CACHING_ENABLED", &value)?;
        }
        if let Ok(value) = env::var("ROUTEWISE_CACHE_TTL_SECS") {
            self.routing.cache_ttl_secs = parse_env("ROUTEWISE_CACHE_TTL_SECS", &value)?;
        }
        if let Ok(value) = env::var("ROUTEWISE_DEFAULT_STRATEGY") {
            self.routing.default_strategy = value;
        }
        if let Ok(value) = env::var("ROUTEWISE_LOG_LEVEL") {
            self.logging.level = value;
        }

        self.validate()?;
        Ok(self)
    }

    /// Enabled providers in configuration order
    pub fn enabled_providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.enabled)
    }

    /// Look up a provider by id
    pub fn provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        let mut seen = HashSet::with_capacity(self.providers.len());
        for provider in &self.providers {
            if provider.id.trim().is_empty() {
                return Err(RoutewiseError::config("Provider id must not be empty"));
            }
            if !seen.insert(provider.id.as_str()) {
                return Err(RoutewiseError::config(format!(
                    "Duplicate provider id: {}",
                    provider.id
                )));
            }
            if provider.models.is_empty() {
                return Err(RoutewiseError::config(format!(
                    "Provider {} has no models",
                    provider.id
                )));
            }
            for model in &provider.models {
                if model.name.trim().is_empty() {
                    return Err(RoutewiseError::config(format!(
                        "Provider {} has a model without a name",
                        provider.id
                    )));
                }
                if !model.cost_per_token.is_finite() || model.cost_per_token < 0.0 {
                    return Err(RoutewiseError::config(format!(
                        "Model {}/{} has invalid cost_per_token: {}",
                        provider.id, model.name, model.cost_per_token
                    )));
                }
            }
        }

        let routing = &self.routing;
        if routing.default_strategy.trim().is_empty() {
            return Err(RoutewiseError::config("default_strategy must not be empty"));
        }
        if routing.default_timeout_ms == 0 {
            return Err(RoutewiseError::config("default_timeout_ms must be positive"));
        }
        if routing.health_check_timeout_ms == 0 {
            return Err(RoutewiseError::config(
                "health_check_timeout_ms must be positive",
            ));
        }
        if routing.metrics_refresh_interval_secs == 0 || routing.cache_cleanup_interval_secs == 0
        {
            return Err(RoutewiseError::config("Timer intervals must be positive"));
        }
        if routing.batch_concurrency == 0 {
            return Err(RoutewiseError::config("batch_concurrency must be positive"));
        }

        if self.enabled_providers().next().is_none() {
            warn!("No enabled providers configured; every request will be rejected");
        }

        debug!("Configuration validation completed");
        Ok(())
    }
}

fn parse_env<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| RoutewiseError::config(format!("Invalid {}: {}", name, e)))
}
