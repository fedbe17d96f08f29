//! Batch load distribution tests

use crate::common::{ConfigFactory, RouterFactory};
use routewise::{LoadBalancingStrategy, RoutingRequest};
use std::collections::HashMap;

fn batch(size: usize) -> Vec<RoutingRequest> {
    (0..size)
        .map(|i| RoutingRequest::new(format!("job {}", i)))
        .collect()
}

#[tokio::test]
async fn test_round_robin_over_catalogue() {
    let (router, _) = RouterFactory::build(ConfigFactory::catalogue());
    let strategy: LoadBalancingStrategy = "round-robin".parse().unwrap();

    let responses = router.distribute_load(batch(8), strategy).await;
    let models: Vec<_> = responses.iter().map(|r| r.model.as_str()).collect();
    assert_eq!(
        models,
        vec![
            "gpt-4o",
            "gpt-4o-mini",
            "claude-sonnet",
            "llama-8b",
            "gpt-4o",
            "gpt-4o-mini",
            "claude-sonnet",
            "llama-8b"
        ]
    );
    assert!(responses.iter().all(|r| r.success && !r.id.is_empty()));
}

#[tokio::test]
async fn test_weighted_frequencies_track_weights() {
    let mut config = ConfigFactory::catalogue();
    config.routing.batch_concurrency = 64;
    let (router, _) = RouterFactory::build(config);

    let draws = 2000;
    let responses = router
        .distribute_load(batch(draws), LoadBalancingStrategy::Weighted)
        .await;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for response in &responses {
        *counts.entry(response.model.clone()).or_default() += 1;
    }

    // Weight = availability * quality / (1 + error rate)
    let weights = [
        ("gpt-4o", 1.0),
        ("gpt-4o-mini", 0.8),
        ("claude-sonnet", 1.0),
        ("llama-8b", 0.6),
    ];
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    for (model, weight) in weights {
        let observed = counts.get(model).copied().unwrap_or(0) as f64 / draws as f64;
        let expected = weight / total;
        assert!(
            (observed - expected).abs() < 0.05,
            "{}: observed {:.3}, expected {:.3}",
            model,
            observed,
            expected
        );
    }
}

#[tokio::test]
async fn test_batch_survives_provider_outage() {
    let (router, backends) = RouterFactory::build(ConfigFactory::catalogue());
    backends["anthropic"].set_failing(true);

    let responses = router
        .distribute_load(batch(4), LoadBalancingStrategy::RoundRobin)
        .await;

    assert_eq!(responses.len(), 4);
    let failed: Vec<_> = responses.iter().filter(|r| !r.success).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].provider, "anthropic");
    assert!(!failed[0].metadata.fallback_used);
}
