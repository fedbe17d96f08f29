//! Routing settings

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Global routing flags and timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingSettings {
    /// Try other providers when the selected one fails
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,
    /// Memoize successful responses
    #[serde(default = "default_true")]
    pub caching_enabled: bool,
    /// Cache TTL in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Strategy active at startup
    #[serde(default = "default_strategy_name")]
    pub default_strategy: String,
    /// Per-call deadline when the request sets no `max_response_time_ms`
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    /// Interval of the external stats refresh
    #[serde(default = "default_metrics_refresh_interval")]
    pub metrics_refresh_interval_secs: u64,
    /// Interval of the expired cache entry purge
    #[serde(default = "default_cache_cleanup_interval")]
    pub cache_cleanup_interval_secs: u64,
    /// Deadline for a single health check during warmup
    #[serde(default = "default_health_check_timeout_ms")]
    pub health_check_timeout_ms: u64,
    /// Batch items dispatched concurrently by the load distributor
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            caching_enabled: true,
            cache_ttl_secs: default_cache_ttl(),
            default_strategy: default_strategy_name(),
            default_timeout_ms: default_timeout_ms(),
            metrics_refresh_interval_secs: default_metrics_refresh_interval(),
            cache_cleanup_interval_secs: default_cache_cleanup_interval(),
            health_check_timeout_ms: default_health_check_timeout_ms(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

impl RoutingSettings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn metrics_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_refresh_interval_secs)
    }

    pub fn cache_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cache_cleanup_interval_secs)
    }

    pub fn health_check_timeout(&self) -> Duration {
        Duration::from_millis(self.health_check_timeout_ms)
    }
}
