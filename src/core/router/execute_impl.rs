//! Single-request execution for Router
//!
//! Cache check, candidate selection, dispatch, metrics, caching and the
//! fallback walk over the remaining providers.

use super::error::{RouterError, RouterResult};
use super::metrics::InFlightGuard;
use super::router::Router;
use super::scoring;
use super::selection::CandidateSelector;
use super::types::{
    EnhancedRoutingResponse, ResponseMetadata, RoutingDecision, RoutingRequest, ServiceKey,
};
use crate::core::backend::{BackendError, GenerationOutput, TokenUsage};
use crate::core::cache::CacheKey;
use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Quality reported for fallback responses, which skip real selection
pub const FALLBACK_QUALITY_PLACEHOLDER: f64 = 0.5;

/// Result of one backend call
#[derive(Debug)]
pub(crate) struct DispatchOutcome {
    pub key: ServiceKey,
    pub result: Result<GenerationOutput, BackendError>,
    pub response_time_ms: f64,
}

/// Cache key for a request under a strategy
pub fn cache_key_for(request: &RoutingRequest, strategy: &str) -> CacheKey {
    CacheKey::compute(
        &request.prompt,
        request.preferred_model(),
        request.params.temperature,
        request.params.max_tokens,
        strategy,
    )
}

impl Router {
    /// Route one request end to end
    pub async fn route_request(
        &self,
        mut request: RoutingRequest,
    ) -> RouterResult<EnhancedRoutingResponse> {
        let request_id = request.ensure_id().to_string();
        let strategy = self.strategies.active();
        let routing = &self.config.routing;

        let cache_key = routing
            .caching_enabled
            .then(|| cache_key_for(&request, &strategy.name));

        if let Some(key) = &cache_key {
            if let Some(mut cached) = self.cache.get(key).await {
                debug!("Cache hit: request_id={}, key={}", request_id, key);
                cached.id = request_id;
                cached.metadata.cache_hit = true;
                return Ok(cached);
            }
        }

        let decision = CandidateSelector::new(&self.metrics)
            .select(&request, &strategy)
            .inspect_err(|e| warn!("Selection failed: request_id={}, error={}", request_id, e))?;

        debug!(
            "Dispatching: request_id={}, service={}/{}, score={:.3}",
            request_id, decision.provider, decision.model, decision.score
        );

        let guard = self.metrics.begin_call(&decision.key());
        let outcome = self
            .dispatch(guard, &request, self.call_timeout(&request))
            .await;

        match outcome.result {
            Ok(output) => {
                let response = self.success_response(
                    &request_id,
                    decision,
                    output,
                    outcome.response_time_ms,
                    &strategy.name,
                    false,
                );
                if let Some(key) = cache_key {
                    self.cache
                        .set(key, response.clone(), routing.cache_ttl())
                        .await;
                }
                info!(
                    "Request routed: request_id={}, service={}, response_time_ms={:.0}",
                    request_id,
                    response.service_key(),
                    response.response_time_ms
                );
                Ok(response)
            }
            Err(err) => {
                warn!(
                    "Dispatch failed: request_id={}, service={}, error={}",
                    request_id, outcome.key, err
                );
                if !routing.fallback_enabled {
                    return Err(RouterError::Backend(err));
                }
                self.route_fallback(&request, &decision.provider, err, &strategy.name)
                    .await
            }
        }
    }

    /// Try each other enabled provider in configuration order
    ///
    /// The original error is surfaced when every fallback fails; fallback
    /// errors are only logged.
    async fn route_fallback(
        &self,
        request: &RoutingRequest,
        failed_provider: &str,
        original: BackendError,
        strategy: &str,
    ) -> RouterResult<EnhancedRoutingResponse> {
        let request_id = request.request_id();
        let candidates = self.fallback_candidates(request, failed_provider);

        if candidates.is_empty() {
            warn!(
                "No fallback providers: request_id={}, failed_provider={}",
                request_id, failed_provider
            );
            return Err(RouterError::AllFallbacksFailed {
                request_id: request_id.to_string(),
                original,
            });
        }

        let timeout = self.call_timeout(request);
        for key in candidates {
            debug!("Trying fallback: request_id={}, service={}", request_id, key);
            let guard = self.metrics.begin_call(&key);
            let outcome = self.dispatch(guard, request, timeout).await;
            match outcome.result {
                Ok(output) => {
                    info!(
                        "Fallback succeeded: request_id={}, service={}, failed_provider={}",
                        request_id, key, failed_provider
                    );
                    let decision = RoutingDecision {
                        provider: key.provider,
                        model: key.model,
                        score: 0.0,
                        reasoning: vec![format!(
                            "Fallback after {} failed: {}",
                            failed_provider, original
                        )],
                        alternatives: Vec::new(),
                    };
                    // Fallback responses are never cached.
                    return Ok(self.success_response(
                        request_id,
                        decision,
                        output,
                        outcome.response_time_ms,
                        strategy,
                        true,
                    ));
                }
                Err(err) => {
                    warn!(
                        "Fallback failed: request_id={}, service={}, error={}",
                        request_id, key, err
                    );
                }
            }
        }

        Err(RouterError::Backend(original))
    }

    /// Enabled providers other than the failed one, with their first model
    pub(crate) fn fallback_candidates(
        &self,
        request: &RoutingRequest,
        failed_provider: &str,
    ) -> Vec<ServiceKey> {
        self.config
            .enabled_providers()
            .filter(|p| p.id != failed_provider && !request.is_provider_blocked(&p.id))
            .filter_map(|p| {
                p.primary_model()
                    .map(|model| ServiceKey::new(&p.id, &model.name))
            })
            .collect()
    }

    /// Per-call deadline
    pub(crate) fn call_timeout(&self, request: &RoutingRequest) -> Duration {
        request
            .max_response_time_ms()
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.config.routing.default_timeout())
    }

    /// Call the backend for the guarded service and record the outcome
    ///
    /// The call runs on its own task, so metrics are still recorded if the
    /// caller stops waiting.
    pub(crate) async fn dispatch(
        &self,
        guard: InFlightGuard,
        request: &RoutingRequest,
        timeout: Duration,
    ) -> DispatchOutcome {
        let key = guard.key().clone();
        let client = self.backends.get(&key.provider);
        let prompt = request.prompt.clone();
        let params = request.params.clone();
        let task_key = key.clone();

        let handle = tokio::spawn(async move {
            let key = task_key;
            let start = Instant::now();
            let result = match client {
                Some(client) => {
                    match tokio::time::timeout(
                        timeout,
                        client.generate_text(&prompt, &key.model, &params),
                    )
                    .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(BackendError::timeout(
                            &key.provider,
                            timeout.as_millis() as u64,
                        )),
                    }
                }
                None => Err(BackendError::unavailable(
                    &key.provider,
                    "no backend client registered",
                )),
            };
            let response_time_ms = start.elapsed().as_secs_f64() * 1000.0;
            guard
                .store()
                .update(&key, response_time_ms, result.is_ok());
            DispatchOutcome {
                key,
                result,
                response_time_ms,
            }
        });

        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => DispatchOutcome {
                result: Err(BackendError::other(
                    &key.provider,
                    format!("dispatch task failed: {}", e),
                )),
                key,
                response_time_ms: 0.0,
            },
        }
    }

    pub(crate) fn success_response(
        &self,
        request_id: &str,
        decision: RoutingDecision,
        output: GenerationOutput,
        response_time_ms: f64,
        strategy: &str,
        fallback_used: bool,
    ) -> EnhancedRoutingResponse {
        let metrics = self.metrics.get(&decision.key());
        let cost_per_token = metrics.as_ref().map_or(0.0, |m| m.cost_per_token);
        let quality_score = if fallback_used {
            FALLBACK_QUALITY_PLACEHOLDER
        } else {
            metrics.as_ref().map_or(0.0, |m| m.quality_score)
        };

        EnhancedRoutingResponse {
            id: request_id.to_string(),
            provider: decision.provider.clone(),
            model: decision.model.clone(),
            content: output.content,
            usage: output.usage,
            estimated_cost: cost_per_token * f64::from(output.usage.total_tokens),
            response_time_ms,
            success: true,
            error: None,
            metadata: ResponseMetadata {
                decision,
                strategy: strategy.to_string(),
                fallback_used,
                cache_hit: false,
                cost_efficiency: scoring::cost_score(cost_per_token),
                quality_score,
                timestamp: Utc::now(),
            },
        }
    }

    /// Failed batch entry
    pub(crate) fn failure_response(
        &self,
        request_id: &str,
        decision: RoutingDecision,
        error: &dyn std::fmt::Display,
        response_time_ms: f64,
        strategy: &str,
    ) -> EnhancedRoutingResponse {
        EnhancedRoutingResponse {
            id: request_id.to_string(),
            provider: decision.provider.clone(),
            model: decision.model.clone(),
            content: String::new(),
            usage: TokenUsage::default(),
            estimated_cost: 0.0,
            response_time_ms,
            success: false,
            error: Some(error.to_string()),
            metadata: ResponseMetadata {
                decision,
                strategy: strategy.to_string(),
                fallback_used: false,
                cache_hit: false,
                cost_efficiency: 0.0,
                quality_score: 0.0,
                timestamp: Utc::now(),
            },
        }
    }
}
