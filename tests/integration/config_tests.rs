//! Configuration loading tests

use crate::common::fixtures::CATALOGUE_YAML;
use crate::common::{ConfigFactory, RouterFactory};
use routewise::config::{LoggingConfig, SpeedTier};
use routewise::{Config, RouterError, RoutewiseError, init_logging};
use std::io::Write;
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_load_catalogue_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CATALOGUE_YAML.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).await.unwrap();
    assert_eq!(config.providers.len(), 3);
    assert_eq!(config.providers[0].models[1].speed, SpeedTier::Fast);
    assert_eq!(config.routing.cache_ttl_secs, 600);
    assert!(config.routing.fallback_enabled);
}

#[test]
fn test_router_seeds_every_enabled_model() {
    let (router, _) = RouterFactory::build(ConfigFactory::catalogue());
    assert_eq!(router.metrics().len(), 4);
    assert_eq!(
        router.metrics().providers(),
        vec!["openai", "anthropic", "local"]
    );
}

#[test]
fn test_env_overrides() {
    // Only this test touches ROUTEWISE_* variables.
    unsafe {
        std::env::set_var("ROUTEWISE_DEFAULT_STRATEGY", "cost-optimized");
        std::env::set_var("ROUTEWISE_CACHE_TTL_SECS", "42");
        std::env::set_var("ROUTEWISE_FALLBACK_ENABLED", "false");
    }

    let result = ConfigFactory::catalogue().apply_env_overrides();

    unsafe {
        std::env::remove_var("ROUTEWISE_DEFAULT_STRATEGY");
        std::env::remove_var("ROUTEWISE_CACHE_TTL_SECS");
        std::env::remove_var("ROUTEWISE_FALLBACK_ENABLED");
    }

    let config = result.unwrap();
    assert_eq!(config.routing.default_strategy, "cost-optimized");
    assert_eq!(config.routing.cache_ttl_secs, 42);
    assert!(!config.routing.fallback_enabled);
}

#[test]
fn test_invalid_yaml_is_yaml_error() {
    let result = Config::from_yaml_str("providers: [ {id: }");
    assert!(matches!(result, Err(RoutewiseError::Yaml(_))));
}

#[test]
fn test_invalid_catalogue_is_config_error() {
    let result = Config::from_yaml_str("providers:\n  - id: empty\n    models: []\n");
    assert!(matches!(result, Err(RoutewiseError::Config(_))));
}

#[test]
fn test_unknown_default_strategy_surfaces_as_routing_error() {
    let mut config = ConfigFactory::catalogue();
    config.routing.default_strategy = "fastest".to_string();

    let err: RoutewiseError = routewise::Router::new(config, Default::default())
        .map_err(RoutewiseError::from)
        .unwrap_err();
    assert!(err.is_routing());
    assert!(matches!(
        err,
        RoutewiseError::Router(RouterError::UnknownStrategy(_))
    ));
    assert_eq!(err.to_string(), "Unknown routing strategy: fastest");
}

#[test]
fn test_init_logging_is_idempotent() {
    let config = LoggingConfig {
        level: "routewise=debug".to_string(),
        ..Default::default()
    };
    assert!(init_logging(&config).is_ok());
    assert!(init_logging(&config).is_ok());
}
