//! Candidate selection
//!
//! Filter by health and hard constraints, apply the strategy's rules in
//! order, then score and rank. Ranking uses a stable sort so candidates with
//! equal scores keep the order left by the rules (configuration order when
//! no rule re-sorts).

use super::error::{RouterError, RouterResult};
use super::metrics::{ServiceMetrics, ServiceMetricsStore};
use super::scoring;
use super::strategy::{RoutingRule, RoutingStrategy, RuleAction};
use super::types::{AlternativeCandidate, RoutingDecision, RoutingRequest};
use tracing::debug;

/// Candidates below this availability are never selected
pub const MIN_AVAILABILITY: f64 = 0.3;

/// Token count assumed for cost estimates when the request sets no max tokens
pub const DEFAULT_COST_ESTIMATE_TOKENS: u32 = 1000;

/// Runner-ups reported alongside a decision
pub const MAX_ALTERNATIVES: usize = 2;

/// A candidate with its score under the active strategy
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub metrics: ServiceMetrics,
    pub score: f64,
}

/// Estimated cost of serving `request` on a candidate
pub fn estimated_cost(metrics: &ServiceMetrics, request: &RoutingRequest) -> f64 {
    let tokens = request
        .params
        .max_tokens
        .unwrap_or(DEFAULT_COST_ESTIMATE_TOKENS);
    metrics.cost_per_token * f64::from(tokens)
}

/// Whether a candidate is healthy enough and within every set constraint
pub fn is_eligible(metrics: &ServiceMetrics, request: &RoutingRequest) -> bool {
    if metrics.availability < MIN_AVAILABILITY {
        return false;
    }
    let Some(constraints) = &request.constraints else {
        return true;
    };
    if !constraints.is_provider_allowed(&metrics.provider) {
        return false;
    }
    if let Some(max_ms) = constraints.max_response_time_ms {
        if metrics.average_response_time_ms > max_ms as f64 {
            return false;
        }
    }
    if let Some(max_cost) = constraints.max_cost {
        if estimated_cost(metrics, request) > max_cost {
            return false;
        }
    }
    if let Some(min_quality) = constraints.min_quality {
        if metrics.quality_score < min_quality {
            return false;
        }
    }
    true
}

/// Apply one rule's action to the candidate list
fn apply_rule(candidates: &mut Vec<ServiceMetrics>, rule: &RoutingRule, request: &RoutingRequest) {
    let constraints = request.constraints.as_ref();
    match rule.action {
        RuleAction::PreferCheapest => {
            candidates.sort_by(|a, b| a.cost_per_token.total_cmp(&b.cost_per_token));
        }
        RuleAction::PreferFastest => {
            candidates.sort_by(|a, b| {
                a.average_response_time_ms
                    .total_cmp(&b.average_response_time_ms)
            });
        }
        RuleAction::PreferHighestQuality => {
            candidates.sort_by(|a, b| b.quality_score.total_cmp(&a.quality_score));
        }
        RuleAction::FilterByCost { max_cost } => {
            if let Some(limit) = max_cost.or_else(|| constraints.and_then(|c| c.max_cost)) {
                candidates.retain(|m| estimated_cost(m, request) <= limit);
            }
        }
        RuleAction::FilterByResponseTime { max_ms } => {
            let limit = max_ms.or_else(|| {
                constraints
                    .and_then(|c| c.max_response_time_ms)
                    .map(|ms| ms as f64)
            });
            if let Some(limit) = limit {
                candidates.retain(|m| m.average_response_time_ms <= limit);
            }
        }
        RuleAction::FilterByQuality { min_quality } => {
            if let Some(limit) = min_quality.or_else(|| constraints.and_then(|c| c.min_quality)) {
                candidates.retain(|m| m.quality_score >= limit);
            }
        }
        RuleAction::SwitchOnLowAvailability { threshold } => {
            let (mut healthy, degraded): (Vec<_>, Vec<_>) = candidates
                .drain(..)
                .partition(|m| m.availability >= threshold);
            healthy.extend(degraded);
            *candidates = healthy;
        }
    }
}

fn describe(metrics: &ServiceMetrics) -> Vec<String> {
    vec![
        format!("Availability {:.0}%", metrics.availability * 100.0),
        format!(
            "Average response time {:.0}ms",
            metrics.average_response_time_ms
        ),
        format!("Cost per token {:.5}", metrics.cost_per_token),
        format!("Quality score {:.2}", metrics.quality_score),
    ]
}

/// Build a decision from ranked candidates, best first
pub fn decision_from_ranked(
    ranked: &[ScoredCandidate],
    request: &RoutingRequest,
    strategy: &RoutingStrategy,
) -> Option<RoutingDecision> {
    let (winner, rest) = ranked.split_first()?;
    let metrics = &winner.metrics;

    let mut reasoning = vec![format!(
        "Selected {}/{} with score {:.3} under strategy {}",
        metrics.provider, metrics.model, winner.score, strategy.name
    )];
    reasoning.extend(describe(metrics));
    if request.preferred_provider() == Some(metrics.provider.as_str()) {
        reasoning.push(format!("Matches preferred provider {}", metrics.provider));
    }
    if request.preferred_model() == Some(metrics.model.as_str()) {
        reasoning.push(format!("Matches preferred model {}", metrics.model));
    }

    let alternatives = rest
        .iter()
        .take(MAX_ALTERNATIVES)
        .map(|candidate| {
            let mut reasoning = vec![format!("Score {:.3}", candidate.score)];
            reasoning.extend(describe(&candidate.metrics));
            AlternativeCandidate {
                provider: candidate.metrics.provider.clone(),
                model: candidate.metrics.model.clone(),
                score: candidate.score,
                reasoning,
            }
        })
        .collect();

    Some(RoutingDecision {
        provider: metrics.provider.clone(),
        model: metrics.model.clone(),
        score: winner.score,
        reasoning,
        alternatives,
    })
}

/// Ranks candidates from the metrics store
#[derive(Debug, Clone, Copy)]
pub struct CandidateSelector<'a> {
    metrics: &'a ServiceMetricsStore,
}

impl<'a> CandidateSelector<'a> {
    pub fn new(metrics: &'a ServiceMetricsStore) -> Self {
        Self { metrics }
    }

    /// Every eligible candidate, best first
    pub fn rank(
        &self,
        request: &RoutingRequest,
        strategy: &RoutingStrategy,
    ) -> RouterResult<Vec<ScoredCandidate>> {
        let snapshot = self.metrics.snapshot();
        let total = snapshot.len();

        let mut candidates: Vec<ServiceMetrics> = snapshot
            .into_iter()
            .filter(|m| is_eligible(m, request))
            .collect();
        let eligible = candidates.len();

        for rule in &strategy.rules {
            if rule.condition.matches(request) {
                apply_rule(&mut candidates, rule, request);
            }
        }

        debug!(
            "Candidate filtering: request_id={}, strategy={}, total={}, eligible={}, after_rules={}",
            request.request_id(),
            strategy.name,
            total,
            eligible,
            candidates.len()
        );

        if candidates.is_empty() {
            let reason = if total == 0 {
                "no services registered".to_string()
            } else {
                format!("all {} services filtered out", total)
            };
            return Err(RouterError::no_service(request.request_id(), reason));
        }

        let mut ranked: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|metrics| {
                let score = scoring::score(&metrics, request, strategy);
                ScoredCandidate { metrics, score }
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(ranked)
    }

    /// Pick the best candidate
    pub fn select(
        &self,
        request: &RoutingRequest,
        strategy: &RoutingStrategy,
    ) -> RouterResult<RoutingDecision> {
        let ranked = self.rank(request, strategy)?;
        decision_from_ranked(&ranked, request, strategy)
            .ok_or_else(|| RouterError::no_service(request.request_id(), "no candidates ranked"))
    }
}
