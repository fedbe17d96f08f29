//! Backend client seam
//!
//! The router never talks to a provider API directly. Each provider id maps
//! to a `BackendClient` that performs the generation and health probes.

pub mod error;
pub mod types;

pub use error::BackendError;
pub use types::{
    BackendHealth, GenerationOutput, HealthReport, PoolStats, SamplingParams, TokenUsage,
};

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Text-generation backend for one provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Generate text for a prompt on the given model
    async fn generate_text(
        &self,
        prompt: &str,
        model: &str,
        params: &SamplingParams,
    ) -> Result<GenerationOutput, BackendError>;

    /// Probe the backend
    async fn health_check(&self) -> Result<HealthReport, BackendError>;

    /// Pool counters used by the periodic metrics refresh
    async fn pool_stats(&self) -> Option<PoolStats> {
        None
    }
}

/// Backend clients keyed by provider id
#[derive(Default, Clone)]
pub struct BackendRegistry {
    clients: Arc<DashMap<String, Arc<dyn BackendClient>>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client (builder pattern)
    pub fn with_client(self, provider_id: &str, client: Arc<dyn BackendClient>) -> Self {
        self.register(provider_id, client);
        self
    }

    pub fn register(&self, provider_id: &str, client: Arc<dyn BackendClient>) {
        debug!("Registered backend client for provider {}", provider_id);
        self.clients.insert(provider_id.to_string(), client);
    }

    pub fn remove(&self, provider_id: &str) -> Option<Arc<dyn BackendClient>> {
        self.clients.remove(provider_id).map(|(_, client)| client)
    }

    pub fn get(&self, provider_id: &str) -> Option<Arc<dyn BackendClient>> {
        self.clients
            .get(provider_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, provider_id: &str) -> bool {
        self.clients.contains_key(provider_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<String> = self.clients.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        f.debug_struct("BackendRegistry")
            .field("providers", &ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registry_lookup() {
        let mut mock = MockBackendClient::new();
        mock.expect_health_check()
            .returning(|| Ok(HealthReport::healthy(12.0)));

        let registry = BackendRegistry::new().with_client("acme", Arc::new(mock));
        assert!(registry.contains("acme"));
        assert!(registry.get("other").is_none());

        let client = registry.get("acme").unwrap();
        let report = client.health_check().await.unwrap();
        assert_eq!(report.status, BackendHealth::Healthy);
    }

    #[tokio::test]
    async fn test_pool_stats_default_is_none() {
        let mut mock = MockBackendClient::new();
        mock.expect_pool_stats().returning(|| None);
        assert!(mock.pool_stats().await.is_none());
    }

    #[test]
    fn test_remove_client() {
        let registry = BackendRegistry::new().with_client("acme", Arc::new(MockBackendClient::new()));
        assert!(registry.remove("acme").is_some());
        assert!(registry.is_empty());
    }
}
