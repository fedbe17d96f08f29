//! Routing strategies
//!
//! A strategy is a weight vector over the score components plus an ordered
//! list of typed filter/sort rules.

pub mod builtin;
pub mod registry;
pub mod types;

pub use registry::StrategyRegistry;
pub use types::{RoutingRule, RoutingStrategy, RuleAction, RuleCondition, StrategyWeights};
