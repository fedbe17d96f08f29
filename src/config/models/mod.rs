//! Configuration data models
//!
//! This module defines all configuration structures consumed by the router.

pub mod logging;
pub mod provider;
pub mod routing;

pub use logging::*;
pub use provider::*;
pub use routing::*;

/// Default cache TTL in seconds
pub fn default_cache_ttl() -> u64 {
    3600 // 1 hour
}

/// Default per-call deadline in milliseconds
pub fn default_timeout_ms() -> u64 {
    30_000
}

/// Default metrics refresh interval in seconds
pub fn default_metrics_refresh_interval() -> u64 {
    60
}

/// Default cache cleanup interval in seconds
pub fn default_cache_cleanup_interval() -> u64 {
    300
}

/// Default health check timeout in milliseconds
pub fn default_health_check_timeout_ms() -> u64 {
    10_000
}

/// Default number of batch items dispatched at once
pub fn default_batch_concurrency() -> usize {
    10
}

/// Default active strategy name
pub fn default_strategy_name() -> String {
    "balanced".to_string()
}

pub fn default_true() -> bool {
    true
}
