//! End-to-end routing tests

use crate::common::{ConfigFactory, EchoBackend, RouterFactory};
use routewise::core::backend::{BackendRegistry, PoolStats};
use routewise::core::router::types::{CostPreference, ServiceKey};
use routewise::{Router, RouterError, RoutingRequest, UserPreferences};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_balanced_routing_over_catalogue() {
    let (router, backends) = RouterFactory::build(ConfigFactory::catalogue());

    let response = router
        .route_request(RoutingRequest::new("summarize this").with_max_tokens(64))
        .await
        .unwrap();

    assert_eq!(response.provider, "openai");
    assert_eq!(response.model, "gpt-4o-mini");
    assert_eq!(response.content, "[openai:gpt-4o-mini] summarize this");
    assert_eq!(backends["openai"].calls(), 1);
    assert_eq!(response.metadata.decision.alternatives.len(), 2);
}

#[tokio::test]
async fn test_low_cost_preference_shifts_selection() {
    let (router, _) = RouterFactory::build(ConfigFactory::pair(0.001, 0.02));

    let plain = router
        .route_request(RoutingRequest::new("a"))
        .await
        .unwrap();
    assert_eq!(plain.provider, "premium");

    let frugal = router
        .route_request(RoutingRequest::new("b").with_preferences(UserPreferences {
            cost: Some(CostPreference::Low),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(frugal.provider, "cheap");
}

#[tokio::test]
async fn test_outage_falls_back_in_configuration_order() {
    let (router, backends) = RouterFactory::build(ConfigFactory::catalogue());
    backends["openai"].set_failing(true);

    let response = router
        .route_request(RoutingRequest::new("hello"))
        .await
        .unwrap();

    assert!(response.metadata.fallback_used);
    assert_eq!(response.provider, "anthropic");
    assert_eq!(response.model, "claude-sonnet");
}

#[tokio::test]
async fn test_warmup_then_route_avoids_unhealthy_provider() {
    let (router, backends) = RouterFactory::build(ConfigFactory::catalogue());
    backends["openai"].set_failing(true);

    router.warmup_services(None).await;
    let response = router
        .route_request(RoutingRequest::new("hello"))
        .await
        .unwrap();

    assert!(!response.metadata.fallback_used);
    assert_ne!(response.provider, "openai");
    assert_eq!(backends["openai"].calls(), 0);
}

#[tokio::test]
async fn test_race_returns_fastest_close_candidate() {
    let registry = BackendRegistry::new()
        .with_client(
            "cheap",
            Arc::new(EchoBackend::new("cheap").with_delay(Duration::from_millis(10))),
        )
        .with_client(
            "premium",
            Arc::new(EchoBackend::new("premium").with_delay(Duration::from_millis(2500))),
        );
    let router = Router::new(ConfigFactory::pair(0.001, 0.02), registry).unwrap();

    let response = router
        .route_concurrent_request(RoutingRequest::new("race"), 2)
        .await
        .unwrap();

    assert_eq!(response.provider, "cheap");
    let stats = router.routing_stats().await;
    assert_eq!(stats.total_requests, 2);
}

#[tokio::test]
async fn test_cache_hit_and_stats() {
    let (router, backends) = RouterFactory::build(ConfigFactory::catalogue());
    let request = RoutingRequest::new("cache me").with_temperature(0.1);

    let first = router.route_request(request.clone()).await.unwrap();
    let second = router.route_request(request).await.unwrap();

    assert_eq!(first.content, second.content);
    assert!(second.metadata.cache_hit);
    assert_eq!(backends["openai"].calls(), 1);

    let stats = router.routing_stats().await;
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.cache_stats.total_entries, 1);
    assert!(stats.cache_stats.hit_rate > 0.0);
}

#[tokio::test]
async fn test_refresh_uses_pool_stats() {
    let registry = BackendRegistry::new()
        .with_client(
            "cheap",
            Arc::new(EchoBackend::new("cheap").with_pool_stats(PoolStats {
                healthy_instances: 0,
                total_instances: 3,
                total_errors: 9,
                total_requests: 9,
            })),
        )
        .with_client("premium", Arc::new(EchoBackend::new("premium")));
    let router = Router::new(ConfigFactory::pair(0.001, 0.02), registry).unwrap();

    assert_eq!(router.refresh_metrics().await, 1);
    let cheap = router
        .metrics()
        .get(&ServiceKey::new("cheap", "cheap-model"))
        .unwrap();
    assert_eq!(cheap.availability, 0.0);
    assert_eq!(cheap.error_rate, 1.0);

    // An empty pool is never selected, even when asked for low cost.
    let response = router
        .route_request(RoutingRequest::new("x").with_preferences(UserPreferences {
            cost: Some(CostPreference::Low),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(response.provider, "premium");
}

#[tokio::test]
async fn test_destroy_then_route_fails() {
    let (router, _) = RouterFactory::build(ConfigFactory::catalogue());
    let router = Arc::new(router);
    router.start_background_tasks();
    router.destroy().await;

    let err = router
        .route_request(RoutingRequest::new("late"))
        .await
        .unwrap_err();
    assert!(matches!(err, RouterError::NoServiceAvailable { .. }));
    assert!(router.available_strategies().is_empty());
}
