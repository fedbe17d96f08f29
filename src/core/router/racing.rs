//! Concurrent racing for Router
//!
//! The same request goes to the top-N candidates at once. Every participant
//! runs to completion (or its own timeout) so all of them get their metrics
//! recorded; the best successful outcome wins.

use super::error::{RouterError, RouterResult};
use super::router::Router;
use super::scoring::race_score;
use super::selection::{CandidateSelector, ScoredCandidate, decision_from_ranked};
use super::types::{EnhancedRoutingResponse, RoutingRequest};
use futures::future::join_all;
use tracing::{debug, info, warn};

impl Router {
    /// Race a request across the `concurrency` best candidates
    ///
    /// Responses from racing are neither read from nor written to the cache.
    /// When no participant succeeds the request is escalated to
    /// [`Router::route_request`].
    pub async fn route_concurrent_request(
        &self,
        mut request: RoutingRequest,
        concurrency: usize,
    ) -> RouterResult<EnhancedRoutingResponse> {
        let request_id = request.ensure_id().to_string();
        let strategy = self.strategies.active();
        let concurrency = concurrency.max(1);

        let participants: Vec<ScoredCandidate> = CandidateSelector::new(&self.metrics)
            .rank(&request, &strategy)?
            .into_iter()
            .take(concurrency)
            .collect();

        debug!(
            "Racing: request_id={}, participants={}",
            request_id,
            participants.len()
        );

        let timeout = self.call_timeout(&request);
        let calls = participants.iter().map(|candidate| {
            let guard = self.metrics.begin_call(&candidate.metrics.key());
            self.dispatch(guard, &request, timeout)
        });
        let outcomes = join_all(calls).await;

        let mut winner: Option<(usize, f64)> = None;
        for (index, (candidate, outcome)) in participants.iter().zip(&outcomes).enumerate() {
            match &outcome.result {
                Ok(_) => {
                    let score = race_score(candidate.score, outcome.response_time_ms);
                    if winner.is_none_or(|(_, best)| score > best) {
                        winner = Some((index, score));
                    }
                }
                Err(err) => warn!(
                    "Race participant failed: request_id={}, service={}, error={}",
                    request_id, outcome.key, err
                ),
            }
        }

        let Some((index, winning_score)) = winner else {
            warn!(
                "All race participants failed, escalating to single routing: request_id={}",
                request_id
            );
            return self
                .route_request(request)
                .await
                .map_err(|source| RouterError::AllCandidatesFailed {
                    request_id,
                    source: Box::new(source),
                });
        };

        let mut ordered = Vec::with_capacity(participants.len());
        ordered.push(participants[index].clone());
        ordered.extend(
            participants
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, c)| c.clone()),
        );
        let Some(mut decision) = decision_from_ranked(&ordered, &request, &strategy) else {
            return Err(RouterError::no_service(&request_id, "no race participants"));
        };
        decision.reasoning.push(format!(
            "Won race among {} candidates with race score {:.3}",
            participants.len(),
            winning_score
        ));

        let Some(outcome) = outcomes.into_iter().nth(index) else {
            return Err(RouterError::no_service(&request_id, "race winner missing"));
        };
        let response_time_ms = outcome.response_time_ms;
        let output = outcome.result?;

        info!(
            "Race won: request_id={}, service={}/{}, response_time_ms={:.0}",
            request_id, decision.provider, decision.model, response_time_ms
        );
        Ok(self.success_response(
            &request_id,
            decision,
            output,
            response_time_ms,
            &strategy.name,
            false,
        ))
    }
}
