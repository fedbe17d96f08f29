//! Configuration and router factories

use super::backends::EchoBackend;
use routewise::config::{Config, ModelConfig, ProviderConfig, QualityTier, SpeedTier};
use routewise::core::backend::BackendRegistry;
use routewise::Router;
use std::collections::HashMap;
use std::sync::Arc;

pub const CATALOGUE_YAML: &str = r#"
providers:
  - id: "openai"
    models:
      - name: "gpt-4o"
        cost_per_token: 0.01
        quality: excellent
        speed: medium
      - name: "gpt-4o-mini"
        cost_per_token: 0.0006
        quality: good
        speed: fast
  - id: "anthropic"
    models:
      - name: "claude-sonnet"
        cost_per_token: 0.015
        quality: excellent
        speed: medium
  - id: "local"
    models:
      - name: "llama-8b"
        cost_per_token: 0.0
        quality: basic
        speed: slow
routing:
  default_strategy: "balanced"
  cache_ttl_secs: 600
"#;

pub struct ConfigFactory;

impl ConfigFactory {
    /// The three-provider catalogue above
    pub fn catalogue() -> Config {
        Config::from_yaml_str(CATALOGUE_YAML).expect("catalogue parses")
    }

    /// Two single-model providers with the given costs
    pub fn pair(cheap_cost: f64, premium_cost: f64) -> Config {
        Config {
            providers: vec![
                ProviderConfig::new("cheap").with_model(
                    ModelConfig::new("cheap-model", cheap_cost)
                        .with_quality(QualityTier::Basic)
                        .with_speed(SpeedTier::Fast),
                ),
                ProviderConfig::new("premium").with_model(
                    ModelConfig::new("premium-model", premium_cost)
                        .with_quality(QualityTier::Excellent)
                        .with_speed(SpeedTier::Medium),
                ),
            ],
            ..Default::default()
        }
    }
}

pub struct RouterFactory;

impl RouterFactory {
    /// Router with an `EchoBackend` behind every configured provider
    pub fn build(config: Config) -> (Router, HashMap<String, Arc<EchoBackend>>) {
        let registry = BackendRegistry::new();
        let mut backends = HashMap::new();
        for provider in &config.providers {
            let backend = Arc::new(EchoBackend::new(&provider.id));
            registry.register(&provider.id, backend.clone());
            backends.insert(provider.id.clone(), backend);
        }
        let router = Router::new(config, registry).expect("router builds");
        (router, backends)
    }
}
