//! Strategies registered on every new router

use super::types::{RoutingRule, RoutingStrategy, RuleAction, StrategyWeights};

pub const BALANCED: &str = "balanced";
pub const COST_OPTIMIZED: &str = "cost-optimized";
pub const SPEED_OPTIMIZED: &str = "speed-optimized";
pub const QUALITY_OPTIMIZED: &str = "quality-optimized";
pub const RELIABILITY_FIRST: &str = "reliability-first";

pub fn balanced() -> RoutingStrategy {
    RoutingStrategy::new(BALANCED, StrategyWeights::default())
        .with_description("Equal weight on cost, speed, quality and availability")
}

pub fn cost_optimized() -> RoutingStrategy {
    RoutingStrategy::new(
        COST_OPTIMIZED,
        StrategyWeights {
            cost: 0.5,
            speed: 0.2,
            quality: 0.2,
            availability: 0.1,
        },
    )
    .with_description("Minimize spend")
    .with_rule(RoutingRule::always(RuleAction::FilterByCost { max_cost: None }))
    .with_rule(RoutingRule::always(RuleAction::PreferCheapest))
}

pub fn speed_optimized() -> RoutingStrategy {
    RoutingStrategy::new(
        SPEED_OPTIMIZED,
        StrategyWeights {
            cost: 0.1,
            speed: 0.6,
            quality: 0.1,
            availability: 0.2,
        },
    )
    .with_description("Minimize latency")
    .with_rule(RoutingRule::always(RuleAction::FilterByResponseTime {
        max_ms: None,
    }))
    .with_rule(RoutingRule::always(RuleAction::PreferFastest))
}

pub fn quality_optimized() -> RoutingStrategy {
    RoutingStrategy::new(
        QUALITY_OPTIMIZED,
        StrategyWeights {
            cost: 0.1,
            speed: 0.1,
            quality: 0.6,
            availability: 0.2,
        },
    )
    .with_description("Maximize output quality")
    .with_rule(RoutingRule::always(RuleAction::FilterByQuality {
        min_quality: None,
    }))
    .with_rule(RoutingRule::always(RuleAction::PreferHighestQuality))
}

pub fn reliability_first() -> RoutingStrategy {
    RoutingStrategy::new(
        RELIABILITY_FIRST,
        StrategyWeights {
            cost: 0.1,
            speed: 0.2,
            quality: 0.2,
            availability: 0.5,
        },
    )
    .with_description("Favor the healthiest services")
    .with_rule(RoutingRule::always(RuleAction::SwitchOnLowAvailability {
        threshold: 0.9,
    }))
}

/// All built-in strategies, `balanced` first
pub fn all() -> Vec<RoutingStrategy> {
    vec![
        balanced(),
        cost_optimized(),
        speed_optimized(),
        quality_optimized(),
        reliability_first(),
    ]
}
