//! Live per-service metrics
//!
//! One `ServiceMetrics` entry exists per enabled `(provider, model)` pair.
//! Entries are created at startup and only removed by `reset`.

use super::types::ServiceKey;
use crate::config::{Config, ModelConfig};
use crate::core::backend::PoolStats;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Smoothing factor for response time and success rate
pub const EMA_ALPHA: f64 = 0.3;

/// Floor applied to availability when a health probe fails
pub const FAILED_HEALTH_AVAILABILITY: f64 = 0.1;

/// Live metrics for one `(provider, model)` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceMetrics {
    pub provider: String,
    pub model: String,
    /// Fraction of healthy instances, in `[0, 1]`
    pub availability: f64,
    /// Exponentially smoothed, milliseconds
    pub average_response_time_ms: f64,
    pub error_rate: f64,
    pub cost_per_token: f64,
    /// Static, from model metadata
    pub quality_score: f64,
    /// Requests observed by the backing client pool
    pub throughput: f64,
    pub request_count: u64,
    /// Exponentially smoothed
    pub success_rate: f64,
    pub last_used: Option<DateTime<Utc>>,
    /// Calls currently dispatched to this service
    pub in_flight: u64,
}

impl ServiceMetrics {
    /// Initial metrics derived from static model attributes
    pub fn from_model(provider: &str, model: &ModelConfig) -> Self {
        Self {
            provider: provider.to_string(),
            model: model.name.clone(),
            availability: 1.0,
            average_response_time_ms: model.speed.baseline_response_time_ms(),
            error_rate: 0.0,
            cost_per_token: model.cost_per_token,
            quality_score: model.quality.score(),
            throughput: 0.0,
            request_count: 0,
            success_rate: 1.0,
            last_used: None,
            in_flight: 0,
        }
    }

    pub fn key(&self) -> ServiceKey {
        ServiceKey::new(&self.provider, &self.model)
    }

    fn record(&mut self, response_time_ms: f64, success: bool) {
        let outcome = if success { 1.0 } else { 0.0 };
        self.average_response_time_ms =
            EMA_ALPHA * response_time_ms + (1.0 - EMA_ALPHA) * self.average_response_time_ms;
        self.success_rate = EMA_ALPHA * outcome + (1.0 - EMA_ALPHA) * self.success_rate;
        self.request_count += 1;
        self.last_used = Some(Utc::now());
    }
}

/// Process-wide metrics map
///
/// `DashMap` holds a write lock on the key's shard for the duration of an
/// update, so the read-modify-write of the moving averages is atomic per key.
#[derive(Debug, Default)]
pub struct ServiceMetricsStore {
    entries: DashMap<ServiceKey, ServiceMetrics>,
    /// Registration order; ranking ties and round-robin follow it
    order: RwLock<Vec<ServiceKey>>,
}

impl ServiceMetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry for every enabled model of every enabled provider
    pub fn from_config(config: &Config) -> Self {
        let store = Self::new();
        store.seed(config);
        store
    }

    pub fn seed(&self, config: &Config) {
        for provider in config.enabled_providers() {
            for model in provider.enabled_models() {
                self.register(ServiceMetrics::from_model(&provider.id, model));
            }
        }
        debug!("Seeded metrics for {} services", self.len());
    }

    /// Insert or replace an entry, keeping its original position
    pub fn register(&self, metrics: ServiceMetrics) {
        let key = metrics.key();
        if self.entries.insert(key.clone(), metrics).is_none() {
            self.order.write().push(key);
        }
    }

    pub fn get(&self, key: &ServiceKey) -> Option<ServiceMetrics> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Record one completed call
    pub fn update(&self, key: &ServiceKey, response_time_ms: f64, success: bool) {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.record(response_time_ms, success);
                debug!(
                    "Updated metrics: service={}, response_time_ms={:.1}, success={}, avg={:.1}, success_rate={:.3}",
                    key, response_time_ms, success, entry.average_response_time_ms, entry.success_rate
                );
            }
            None => debug!("Ignoring metrics update for unknown service {}", key),
        }
    }

    /// Recompute availability, error rate and throughput from pool counters
    ///
    /// Every model of a provider shares that provider's counters. Providers
    /// absent from `stats` keep their current values.
    pub fn refresh_from_external_stats(&self, stats: &HashMap<String, PoolStats>) {
        for mut entry in self.entries.iter_mut() {
            if let Some(pool) = stats.get(&entry.provider) {
                entry.availability = pool.availability();
                entry.error_rate = pool.error_rate();
                entry.throughput = pool.total_requests as f64;
            }
        }
        debug!("Refreshed metrics from {} provider pools", stats.len());
    }

    /// Apply a health probe result to every model of a provider
    pub fn apply_health(&self, provider: &str, availability: f64, response_time_ms: Option<f64>) {
        for mut entry in self.entries.iter_mut() {
            if entry.provider == provider {
                entry.availability = availability.clamp(0.0, 1.0);
                if let Some(rt) = response_time_ms {
                    entry.average_response_time_ms = rt;
                }
            }
        }
    }

    /// Mark a call as started; the returned guard ends it on drop
    pub fn begin_call(self: &Arc<Self>, key: &ServiceKey) -> InFlightGuard {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.in_flight += 1;
        }
        InFlightGuard {
            store: Arc::clone(self),
            key: key.clone(),
        }
    }

    fn end_call(&self, key: &ServiceKey) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.in_flight = entry.in_flight.saturating_sub(1);
        }
    }

    /// Entries in registration order
    pub fn snapshot(&self) -> Vec<ServiceMetrics> {
        self.order
            .read()
            .iter()
            .filter_map(|key| self.get(key))
            .collect()
    }

    /// Keys in registration order
    pub fn keys(&self) -> Vec<ServiceKey> {
        self.order.read().clone()
    }

    /// Distinct providers with at least one entry, in registration order
    pub fn providers(&self) -> Vec<String> {
        let mut providers: Vec<String> = Vec::new();
        for key in self.order.read().iter() {
            if !providers.contains(&key.provider) {
                providers.push(key.provider.clone());
            }
        }
        providers
    }

    pub fn total_requests(&self) -> u64 {
        self.entries.iter().map(|e| e.request_count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn reset(&self) {
        let mut order = self.order.write();
        self.entries.clear();
        order.clear();
    }
}

/// A dispatched call; decrements the service's in-flight counter when dropped
#[derive(Debug)]
pub struct InFlightGuard {
    store: Arc<ServiceMetricsStore>,
    key: ServiceKey,
}

impl InFlightGuard {
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    pub(crate) fn store(&self) -> &ServiceMetricsStore {
        &self.store
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.store.end_call(&self.key);
    }
}
