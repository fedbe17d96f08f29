//! Service health for Router
//!
//! Warmup probes seed availability and latency; the periodic refresh pulls
//! pool counters from the backend clients.

use super::metrics::FAILED_HEALTH_AVAILABILITY;
use super::router::Router;
use crate::core::backend::{BackendError, BackendHealth, HealthReport};
use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Availability assigned to a provider that reports itself degraded
pub const DEGRADED_AVAILABILITY: f64 = 0.5;

impl Router {
    /// Probe providers and seed their metrics from the result
    ///
    /// `None` probes every provider with registered services. A failed probe
    /// keeps the provider registered at a low availability instead of
    /// removing it.
    pub async fn warmup_services(&self, provider_ids: Option<&[String]>) {
        let targets = match provider_ids {
            Some(ids) => ids.to_vec(),
            None => self.metrics.providers(),
        };
        info!("Warming up {} providers", targets.len());

        let probes = targets.iter().map(|provider| async move {
            let report = self.probe(provider).await;
            (provider, report)
        });

        for (provider, report) in join_all(probes).await {
            match report {
                Ok(HealthReport {
                    status: BackendHealth::Healthy,
                    response_time_ms,
                }) => {
                    self.metrics
                        .apply_health(provider, 1.0, Some(response_time_ms));
                    debug!("Provider {} healthy ({:.0}ms)", provider, response_time_ms);
                }
                Ok(HealthReport {
                    status: BackendHealth::Degraded,
                    response_time_ms,
                }) => {
                    self.metrics
                        .apply_health(provider, DEGRADED_AVAILABILITY, Some(response_time_ms));
                    warn!("Provider {} degraded ({:.0}ms)", provider, response_time_ms);
                }
                Ok(HealthReport {
                    status: BackendHealth::Unhealthy,
                    ..
                }) => {
                    self.metrics
                        .apply_health(provider, FAILED_HEALTH_AVAILABILITY, None);
                    warn!("Provider {} reported unhealthy", provider);
                }
                Err(err) => {
                    self.metrics
                        .apply_health(provider, FAILED_HEALTH_AVAILABILITY, None);
                    warn!("Health check failed for {}: {}", provider, err);
                }
            }
        }
    }

    async fn probe(&self, provider: &str) -> Result<HealthReport, BackendError> {
        let client = self
            .backends
            .get(provider)
            .ok_or_else(|| BackendError::unavailable(provider, "no backend client registered"))?;
        let timeout = self.config.routing.health_check_timeout();
        tokio::time::timeout(timeout, client.health_check())
            .await
            .unwrap_or_else(|_| Err(BackendError::timeout(provider, timeout.as_millis() as u64)))
    }

    /// Pull pool counters from every backend and refresh the metrics
    ///
    /// Returns how many providers reported counters.
    pub async fn refresh_metrics(&self) -> usize {
        let providers = self.metrics.providers();
        let polls = providers.iter().map(|provider| async move {
            let stats = match self.backends.get(provider) {
                Some(client) => client.pool_stats().await,
                None => None,
            };
            (provider.clone(), stats)
        });

        let stats: HashMap<_, _> = join_all(polls)
            .await
            .into_iter()
            .filter_map(|(provider, stats)| stats.map(|s| (provider, s)))
            .collect();

        if !stats.is_empty() {
            self.metrics.refresh_from_external_stats(&stats);
        }
        stats.len()
    }
}
