//! Candidate scoring
//!
//! Pure functions: the same metrics, request and strategy always produce the
//! same score.

use super::metrics::ServiceMetrics;
use super::strategy::RoutingStrategy;
use super::types::RoutingRequest;

/// Response time at which the speed component reaches zero
pub const SPEED_REFERENCE_MS: f64 = 10_000.0;

/// Cost per token at which the cost component reaches zero
pub const COST_REFERENCE_PER_TOKEN: f64 = 0.1;

/// Weight of each matched user preference
pub const PREFERENCE_BONUS: f64 = 0.2;

pub fn speed_score(average_response_time_ms: f64) -> f64 {
    (1.0 - average_response_time_ms / SPEED_REFERENCE_MS).max(0.0)
}

pub fn cost_score(cost_per_token: f64) -> f64 {
    (1.0 - cost_per_token / COST_REFERENCE_PER_TOKEN).max(0.0)
}

/// Weighted desirability of a candidate under a strategy
pub fn score(metrics: &ServiceMetrics, request: &RoutingRequest, strategy: &RoutingStrategy) -> f64 {
    let weights = &strategy.weights;
    let speed = speed_score(metrics.average_response_time_ms);
    let cost = cost_score(metrics.cost_per_token);

    let mut total = metrics.availability * weights.availability
        + speed * weights.speed
        + cost * weights.cost
        + metrics.quality_score * weights.quality;

    if let Some(preferences) = &request.preferences {
        if preferences.wants_low_cost() {
            total += PREFERENCE_BONUS * cost;
        }
        if preferences.wants_fast() {
            total += PREFERENCE_BONUS * speed;
        }
        if preferences.wants_excellent_quality() {
            total += PREFERENCE_BONUS * metrics.quality_score;
        }
    }

    total
}

/// Racing winner criterion: mostly the selection score, partly observed latency
pub fn race_score(candidate_score: f64, response_time_ms: f64) -> f64 {
    0.7 * candidate_score + 0.3 * (1.0 - response_time_ms / SPEED_REFERENCE_MS)
}

/// Load-distribution weight of a candidate
pub fn load_weight(metrics: &ServiceMetrics) -> f64 {
    (metrics.availability * metrics.quality_score / (1.0 + metrics.error_rate)).max(0.0)
}
