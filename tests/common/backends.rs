//! In-memory backend clients

use async_trait::async_trait;
use routewise::core::backend::{
    BackendClient, BackendError, GenerationOutput, HealthReport, PoolStats, SamplingParams,
    TokenUsage,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Echoes the prompt back, optionally after a delay or with a failure
pub struct EchoBackend {
    provider: String,
    fail: AtomicBool,
    delay: Duration,
    calls: AtomicUsize,
    pool: Option<PoolStats>,
}

impl EchoBackend {
    pub fn new(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            fail: AtomicBool::new(false),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            pool: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_pool_stats(mut self, stats: PoolStats) -> Self {
        self.pool = Some(stats);
        self
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendClient for EchoBackend {
    async fn generate_text(
        &self,
        prompt: &str,
        model: &str,
        params: &SamplingParams,
    ) -> Result<GenerationOutput, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(BackendError::unavailable(&self.provider, "maintenance"));
        }
        let completion = params.max_tokens.unwrap_or(16).min(16);
        Ok(GenerationOutput {
            content: format!("[{}:{}] {}", self.provider, model, prompt),
            usage: TokenUsage::new(prompt.split_whitespace().count() as u32, completion),
        })
    }

    async fn health_check(&self) -> Result<HealthReport, BackendError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(BackendError::unavailable(&self.provider, "maintenance"))
        } else {
            Ok(HealthReport::healthy(50.0))
        }
    }

    async fn pool_stats(&self) -> Option<PoolStats> {
        self.pool
    }
}
