//! Request routing across heterogeneous text-generation backends
//!
//! ## Module Structure
//!
//! - `types` - Requests, decisions and responses
//! - `error` - Router error types
//! - `metrics` - Live per-service metrics with moving averages
//! - `scoring` - Candidate scoring under a strategy
//! - `strategy` - Strategy definitions, built-ins and the registry
//! - `selection` - Candidate filtering, rule application and ranking
//! - `router` - Core Router struct, strategy management, stats and lifecycle
//! - `execute_impl` - Single-request routing with cache and fallback
//! - `racing` - Concurrent top-N dispatch
//! - `load_balancer` - Batch distribution policies
//! - `health` - Warmup probes and periodic metrics refresh

pub mod error;
pub mod execute_impl;
pub mod health;
pub mod load_balancer;
pub mod metrics;
pub mod racing;
pub mod router;
pub mod scoring;
pub mod selection;
pub mod strategy;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{RouterError, RouterResult};
pub use metrics::{ServiceMetrics, ServiceMetricsStore};
pub use router::{Router, RoutingCacheStats, RoutingStats};
pub use selection::{CandidateSelector, ScoredCandidate};
pub use strategy::{
    RoutingRule, RoutingStrategy, RuleAction, RuleCondition, StrategyRegistry, StrategyWeights,
};
pub use types::{
    AlternativeCandidate, CostPreference, EnhancedRoutingResponse, LoadBalancingStrategy,
    QualityPreference, ResponseMetadata, RoutingDecision, RoutingRequest, ServiceKey,
    SpeedPreference, UserConstraints, UserPreferences,
};
