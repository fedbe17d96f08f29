//! Batch load distribution for Router
//!
//! Batches skip per-request scoring, the response cache and fallback. Each
//! request is assigned a service up front, then dispatched with bounded
//! concurrency. The output keeps the input order and a failed call becomes a
//! failed entry instead of aborting the batch.

use super::error::RouterError;
use super::metrics::ServiceMetrics;
use super::router::Router;
use super::scoring;
use super::types::{
    EnhancedRoutingResponse, LoadBalancingStrategy, RoutingDecision, RoutingRequest,
};
use futures::stream::{self, StreamExt};
use rand::Rng;
use std::sync::atomic::Ordering;
use tracing::{debug, info};

/// Draw `count` indices by cumulative-weight roulette over a fixed set of weights
///
/// The weights are not updated between draws. If no weight is positive the
/// draw is uniform.
pub fn weighted_assignments<R: Rng + ?Sized>(
    weights: &[f64],
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    if weights.is_empty() {
        return Vec::new();
    }
    let weights: Vec<f64> = weights
        .iter()
        .map(|w| if w.is_finite() { w.max(0.0) } else { 0.0 })
        .collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return (0..count).map(|_| rng.gen_range(0..weights.len())).collect();
    }
    let last_positive = weights.iter().rposition(|w| *w > 0.0).unwrap_or(0);

    (0..count)
        .map(|_| {
            let mut point = rng.gen_range(0.0..total);
            for (index, weight) in weights.iter().enumerate() {
                if point < *weight {
                    return index;
                }
                point -= weight;
            }
            last_positive
        })
        .collect()
}

/// Assign each of `count` requests to the least loaded candidate
///
/// Loads come from one snapshot and are not bumped between assignments, so
/// every request in the batch lands on the same candidate. Ties go to the
/// earlier candidate.
pub fn least_loaded_assignments(loads: &[f64], count: usize) -> Vec<usize> {
    let Some(best) = loads
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(index, _)| index)
    else {
        return Vec::new();
    };
    vec![best; count]
}

impl Router {
    /// Distribute a batch of independent requests across the service pool
    pub async fn distribute_load(
        &self,
        requests: Vec<RoutingRequest>,
        strategy: LoadBalancingStrategy,
    ) -> Vec<EnhancedRoutingResponse> {
        let active = self.strategies.active();
        let snapshot = self.metrics.snapshot();
        let count = requests.len();

        if snapshot.is_empty() {
            return requests
                .into_iter()
                .map(|mut request| {
                    let request_id = request.ensure_id().to_string();
                    let err = RouterError::no_service(&request_id, "no services registered");
                    let decision = RoutingDecision {
                        provider: String::new(),
                        model: String::new(),
                        score: 0.0,
                        reasoning: Vec::new(),
                        alternatives: Vec::new(),
                    };
                    self.failure_response(&request_id, decision, &err, 0.0, &active.name)
                })
                .collect();
        }

        let assignments = self.assign(&snapshot, count, strategy);
        debug!(
            "Distributing batch: size={}, strategy={}, services={}",
            count,
            strategy,
            snapshot.len()
        );

        let jobs: Vec<_> = requests
            .into_iter()
            .zip(assignments)
            .map(|(mut request, index)| {
                request.ensure_id();
                (request, &snapshot[index])
            })
            .collect();

        let concurrency = self.config.routing.batch_concurrency.max(1);
        let responses: Vec<EnhancedRoutingResponse> = stream::iter(jobs)
            .map(|(request, metrics)| {
                let active = &active;
                async move {
                    let request_id = request.request_id().to_string();
                    // Queued items are not in flight until the stream polls them.
                    let guard = self.metrics.begin_call(&metrics.key());
                    let outcome = self
                        .dispatch(guard, &request, self.call_timeout(&request))
                        .await;
                    let decision = RoutingDecision {
                        provider: metrics.provider.clone(),
                        model: metrics.model.clone(),
                        score: scoring::score(metrics, &request, active),
                        reasoning: vec![format!("Assigned by {} load balancing", strategy)],
                        alternatives: Vec::new(),
                    };
                    match outcome.result {
                        Ok(output) => self.success_response(
                            &request_id,
                            decision,
                            output,
                            outcome.response_time_ms,
                            &active.name,
                            false,
                        ),
                        Err(err) => self.failure_response(
                            &request_id,
                            decision,
                            &err,
                            outcome.response_time_ms,
                            &active.name,
                        ),
                    }
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        let failed = responses.iter().filter(|r| !r.success).count();
        info!(
            "Batch completed: size={}, strategy={}, failed={}",
            count, strategy, failed
        );
        responses
    }

    /// Candidate index for each request in the batch
    fn assign(
        &self,
        snapshot: &[ServiceMetrics],
        count: usize,
        strategy: LoadBalancingStrategy,
    ) -> Vec<usize> {
        match strategy {
            LoadBalancingStrategy::RoundRobin => {
                let start = self.round_robin_counter.fetch_add(count, Ordering::Relaxed);
                (0..count)
                    .map(|i| start.wrapping_add(i) % snapshot.len())
                    .collect()
            }
            LoadBalancingStrategy::Weighted => {
                let weights: Vec<f64> = snapshot.iter().map(scoring::load_weight).collect();
                weighted_assignments(&weights, count, &mut rand::thread_rng())
            }
            LoadBalancingStrategy::LeastConnections => {
                let loads: Vec<f64> = snapshot
                    .iter()
                    .map(|m| m.throughput + m.in_flight as f64)
                    .collect();
                least_loaded_assignments(&loads, count)
            }
        }
    }
}
