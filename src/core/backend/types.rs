//! Backend request/response types

use serde::{Deserialize, Serialize};

/// Sampling parameters forwarded to the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

/// Token usage reported by a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Successful generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub content: String,
    #[serde(default)]
    pub usage: TokenUsage,
}

/// Health status reported by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendHealth {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Result of a backend health check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: BackendHealth,
    pub response_time_ms: f64,
}

impl HealthReport {
    pub fn healthy(response_time_ms: f64) -> Self {
        Self {
            status: BackendHealth::Healthy,
            response_time_ms,
        }
    }

    pub fn degraded(response_time_ms: f64) -> Self {
        Self {
            status: BackendHealth::Degraded,
            response_time_ms,
        }
    }

    pub fn unhealthy(response_time_ms: f64) -> Self {
        Self {
            status: BackendHealth::Unhealthy,
            response_time_ms,
        }
    }
}

/// Counters exposed by the client pool behind one provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    pub healthy_instances: u32,
    pub total_instances: u32,
    pub total_errors: u64,
    pub total_requests: u64,
}

impl PoolStats {
    /// Fraction of healthy instances; a pool with no instances reports 0
    pub fn availability(&self) -> f64 {
        if self.total_instances == 0 {
            0.0
        } else {
            f64::from(self.healthy_instances) / f64::from(self.total_instances)
        }
    }

    pub fn error_rate(&self) -> f64 {
        self.total_errors as f64 / self.total_requests.max(1) as f64
    }
}
