//! Scripted backends and router fixtures shared by the router tests

use crate::config::{Config, ModelConfig, ProviderConfig, QualityTier, SpeedTier};
use crate::core::backend::{
    BackendClient, BackendError, BackendRegistry, GenerationOutput, HealthReport, PoolStats,
    SamplingParams, TokenUsage,
};
use crate::core::router::router::Router;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory backend with scripted behavior
pub(crate) struct ScriptedBackend {
    provider: String,
    failing: AtomicBool,
    delay: Mutex<Duration>,
    calls: AtomicUsize,
    health: Mutex<Result<HealthReport, BackendError>>,
    health_delay: Mutex<Duration>,
    pool: Mutex<Option<PoolStats>>,
}

impl ScriptedBackend {
    pub fn new(provider: &str) -> Arc<Self> {
        Arc::new(Self {
            provider: provider.to_string(),
            failing: AtomicBool::new(false),
            delay: Mutex::new(Duration::ZERO),
            calls: AtomicUsize::new(0),
            health: Mutex::new(Ok(HealthReport::healthy(100.0))),
            health_delay: Mutex::new(Duration::ZERO),
            pool: Mutex::new(None),
        })
    }

    pub fn failing(provider: &str) -> Arc<Self> {
        let backend = Self::new(provider);
        backend.set_failing(true);
        backend
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    pub fn set_health(&self, health: Result<HealthReport, BackendError>) {
        *self.health.lock() = health;
    }

    pub fn set_health_delay(&self, delay: Duration) {
        *self.health_delay.lock() = delay;
    }

    pub fn set_pool_stats(&self, stats: PoolStats) {
        *self.pool.lock() = Some(stats);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendClient for ScriptedBackend {
    async fn generate_text(
        &self,
        prompt: &str,
        model: &str,
        _params: &SamplingParams,
    ) -> Result<GenerationOutput, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::api(&self.provider, 500, "scripted failure"));
        }
        Ok(GenerationOutput {
            content: format!("{}/{}: {}", self.provider, model, prompt),
            usage: TokenUsage::new(10, 20),
        })
    }

    async fn health_check(&self) -> Result<HealthReport, BackendError> {
        let delay = *self.health_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.health.lock().clone()
    }

    async fn pool_stats(&self) -> Option<PoolStats> {
        *self.pool.lock()
    }
}

pub(crate) fn provider(id: &str, cost: f64, quality: QualityTier, speed: SpeedTier) -> ProviderConfig {
    ProviderConfig::new(id).with_model(
        ModelConfig::new(format!("{}-model", id), cost)
            .with_quality(quality)
            .with_speed(speed),
    )
}

/// Three providers with a clear ranking under `balanced`: primary, secondary, tertiary
pub(crate) fn three_provider_config() -> Config {
    Config {
        providers: vec![
            provider("primary", 0.0005, QualityTier::Excellent, SpeedTier::Fast),
            provider("secondary", 0.005, QualityTier::Good, SpeedTier::Medium),
            provider("tertiary", 0.02, QualityTier::Basic, SpeedTier::Slow),
        ],
        ..Default::default()
    }
}

/// A router plus the scripted backend behind each configured provider
pub(crate) struct Fixture {
    pub router: Router,
    pub backends: Vec<(String, Arc<ScriptedBackend>)>,
}

impl Fixture {
    pub fn new(config: Config) -> Self {
        let registry = BackendRegistry::new();
        let mut backends = Vec::new();
        for provider in &config.providers {
            let backend = ScriptedBackend::new(&provider.id);
            registry.register(&provider.id, backend.clone());
            backends.push((provider.id.clone(), backend));
        }
        let router = Router::new(config, registry).unwrap();
        Self { router, backends }
    }

    pub fn backend(&self, provider: &str) -> &Arc<ScriptedBackend> {
        self.backends
            .iter()
            .find(|(id, _)| id == provider)
            .map(|(_, backend)| backend)
            .unwrap()
    }

    pub fn total_calls(&self) -> usize {
        self.backends.iter().map(|(_, b)| b.calls()).sum()
    }
}
