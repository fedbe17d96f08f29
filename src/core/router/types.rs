//! Request and response types for routing

use crate::core::backend::{SamplingParams, TokenUsage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// A `(provider, model)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceKey {
    pub provider: String,
    pub model: String,
}

impl ServiceKey {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostPreference {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPreference {
    Fast,
    Medium,
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityPreference {
    Basic,
    Good,
    Excellent,
}

/// Soft routing hints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<SpeedPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_model: Option<String>,
}

impl UserPreferences {
    pub fn wants_low_cost(&self) -> bool {
        self.cost == Some(CostPreference::Low)
    }

    pub fn wants_fast(&self) -> bool {
        self.speed == Some(SpeedPreference::Fast)
    }

    pub fn wants_excellent_quality(&self) -> bool {
        self.quality == Some(QualityPreference::Excellent)
    }
}

/// Hard limits; a candidate violating any set field is never selected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_response_time_ms: Option<u64>,
    /// Upper bound on `cost_per_token * max_tokens`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quality: Option<f64>,
    /// When set, only these providers are eligible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_providers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_providers: Vec<String>,
}

impl UserConstraints {
    pub fn is_provider_allowed(&self, provider: &str) -> bool {
        if self.blocked_providers.iter().any(|p| p == provider) {
            return false;
        }
        match &self.allowed_providers {
            Some(allowed) => allowed.iter().any(|p| p == provider),
            None => true,
        }
    }
}

/// One text-generation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingRequest {
    /// Correlation id, generated on dispatch when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub prompt: String,
    #[serde(default)]
    pub params: SamplingParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<UserConstraints>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RoutingRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.params.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.params.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_preferences(mut self, preferences: UserPreferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn with_constraints(mut self, constraints: UserConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Assign a correlation id if the caller did not provide one
    pub fn ensure_id(&mut self) -> &str {
        self.id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .as_str()
    }

    /// Correlation id, empty before `ensure_id`
    pub fn request_id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    pub fn preferred_model(&self) -> Option<&str> {
        self.preferences
            .as_ref()
            .and_then(|p| p.preferred_model.as_deref())
    }

    pub fn preferred_provider(&self) -> Option<&str> {
        self.preferences
            .as_ref()
            .and_then(|p| p.preferred_provider.as_deref())
    }

    pub fn max_response_time_ms(&self) -> Option<u64> {
        self.constraints
            .as_ref()
            .and_then(|c| c.max_response_time_ms)
    }

    pub fn is_provider_blocked(&self, provider: &str) -> bool {
        self.constraints
            .as_ref()
            .is_some_and(|c| !c.is_provider_allowed(provider))
    }
}

/// A runner-up candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeCandidate {
    pub provider: String,
    pub model: String,
    pub score: f64,
    pub reasoning: Vec<String>,
}

/// Outcome of candidate selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub provider: String,
    pub model: String,
    pub score: f64,
    pub reasoning: Vec<String>,
    pub alternatives: Vec<AlternativeCandidate>,
}

impl RoutingDecision {
    pub fn key(&self) -> ServiceKey {
        ServiceKey::new(&self.provider, &self.model)
    }
}

/// Routing details attached to every response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub decision: RoutingDecision,
    pub strategy: String,
    pub fallback_used: bool,
    pub cache_hit: bool,
    pub cost_efficiency: f64,
    pub quality_score: f64,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of one routed request; the unit stored in the response cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedRoutingResponse {
    pub id: String,
    pub provider: String,
    pub model: String,
    pub content: String,
    pub usage: TokenUsage,
    pub estimated_cost: f64,
    pub response_time_ms: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub metadata: ResponseMetadata,
}

impl EnhancedRoutingResponse {
    pub fn service_key(&self) -> ServiceKey {
        ServiceKey::new(&self.provider, &self.model)
    }
}

/// Policy for `distribute_load`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadBalancingStrategy {
    RoundRobin,
    Weighted,
    LeastConnections,
}

impl fmt::Display for LoadBalancingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RoundRobin => "round-robin",
            Self::Weighted => "weighted",
            Self::LeastConnections => "least-connections",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for LoadBalancingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round-robin" | "round_robin" => Ok(Self::RoundRobin),
            "weighted" => Ok(Self::Weighted),
            "least-connections" | "least_connections" => Ok(Self::LeastConnections),
            other => Err(format!("Unknown load balancing strategy: {}", other)),
        }
    }
}
