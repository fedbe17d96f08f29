//! Router core structure
//!
//! The router owns every piece of routing state: the metrics map, the
//! strategy registry and the response cache. Nothing is process-global;
//! independent routers never share state.

use super::error::RouterResult;
use super::metrics::{ServiceMetrics, ServiceMetricsStore};
use super::strategy::{RoutingStrategy, StrategyRegistry};
use crate::config::Config;
use crate::core::backend::BackendRegistry;
use crate::core::cache::{InMemoryResponseCache, ResponseCache};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Cache summary reported in `RoutingStats`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingCacheStats {
    pub total_entries: usize,
    pub hit_rate: f64,
}

/// Point-in-time view of the router
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingStats {
    pub current_strategy: String,
    pub total_requests: u64,
    pub cache_stats: RoutingCacheStats,
    pub service_metrics: Vec<ServiceMetrics>,
    pub available_providers: Vec<String>,
}

impl RoutingStats {
    /// Render the stats as pretty-printed JSON for export
    pub fn to_json(&self) -> crate::utils::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Request router
pub struct Router {
    pub(crate) config: Config,
    pub(crate) backends: BackendRegistry,
    pub(crate) metrics: Arc<ServiceMetricsStore>,
    pub(crate) strategies: StrategyRegistry,
    pub(crate) cache: Arc<dyn ResponseCache>,
    /// Cursor for round-robin batch distribution
    pub(crate) round_robin_counter: AtomicUsize,
    background_tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Router {
    /// Create a router with an in-memory response cache
    pub fn new(config: Config, backends: BackendRegistry) -> RouterResult<Self> {
        Self::with_cache(config, backends, Arc::new(InMemoryResponseCache::new()))
    }

    /// Create a router backed by the given cache store
    pub fn with_cache(
        config: Config,
        backends: BackendRegistry,
        cache: Arc<dyn ResponseCache>,
    ) -> RouterResult<Self> {
        let metrics = Arc::new(ServiceMetricsStore::from_config(&config));
        let strategies = StrategyRegistry::new();
        strategies.set_active(&config.routing.default_strategy)?;

        info!(
            "Router created: services={}, strategy={}, fallback={}, caching={}",
            metrics.len(),
            config.routing.default_strategy,
            config.routing.fallback_enabled,
            config.routing.caching_enabled
        );

        Ok(Self {
            config,
            backends,
            metrics,
            strategies,
            cache,
            round_robin_counter: AtomicUsize::new(0),
            background_tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metrics(&self) -> &ServiceMetricsStore {
        &self.metrics
    }

    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    // ========== Strategy Management ==========

    /// Switch the active strategy; requests already in flight keep theirs
    pub fn set_routing_strategy(&self, name: &str) -> RouterResult<()> {
        self.strategies.set_active(name)
    }

    pub fn available_strategies(&self) -> Vec<String> {
        self.strategies.names()
    }

    /// Register (or replace) a strategy
    pub fn add_routing_strategy(&self, strategy: RoutingStrategy) -> RouterResult<()> {
        self.strategies.add(strategy)
    }

    pub fn current_strategy(&self) -> Arc<RoutingStrategy> {
        self.strategies.active()
    }

    // ========== Statistics ==========

    pub async fn routing_stats(&self) -> RoutingStats {
        let cache = self.cache.stats().await;
        RoutingStats {
            current_strategy: self.strategies.active().name.clone(),
            total_requests: self.metrics.total_requests(),
            cache_stats: RoutingCacheStats {
                total_entries: cache.total_entries,
                hit_rate: cache.hit_rate(),
            },
            service_metrics: self.metrics.snapshot(),
            available_providers: self.metrics.providers(),
        }
    }

    // ========== Lifecycle ==========

    /// Drop expired cache entries
    pub async fn cleanup_cache(&self) -> usize {
        self.cache.purge_expired().await
    }

    /// Spawn the periodic metrics refresh and cache cleanup timers
    ///
    /// The tasks hold a weak handle and stop once the router is dropped or
    /// destroyed.
    pub fn start_background_tasks(self: &Arc<Self>) {
        let refresh = self.config.routing.metrics_refresh_interval();
        let cleanup = self.config.routing.cache_cleanup_interval();

        let refresh_task = spawn_periodic(Arc::downgrade(self), refresh, |router| async move {
            router.refresh_metrics().await;
        });
        let cleanup_task = spawn_periodic(Arc::downgrade(self), cleanup, |router| async move {
            router.cleanup_cache().await;
        });

        let mut tasks = self.background_tasks.lock();
        tasks.push(refresh_task);
        tasks.push(cleanup_task);
        debug!(
            "Started background tasks: refresh every {:?}, cache cleanup every {:?}",
            refresh, cleanup
        );
    }

    /// Tear down: stop timers and clear cache, metrics and strategies
    pub async fn destroy(&self) {
        self.stop_background_tasks();
        self.cache.clear().await;
        self.metrics.reset();
        self.strategies.clear();
        info!("Router destroyed");
    }

    fn stop_background_tasks(&self) {
        for task in self.background_tasks.lock().drain(..) {
            task.abort();
        }
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        self.stop_background_tasks();
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("backends", &self.backends)
            .field("services", &self.metrics.len())
            .field("strategy", &self.strategies.active().name)
            .finish()
    }
}

fn spawn_periodic<F, Fut>(router: Weak<Router>, period: Duration, mut tick: F) -> JoinHandle<()>
where
    F: FnMut(Arc<Router>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            let Some(router) = router.upgrade() else {
                break;
            };
            tick(router).await;
        }
    })
}
