//! Routing strategy type definitions

use crate::core::router::types::RoutingRequest;
use serde::{Deserialize, Serialize};

/// Weight vector applied to the score components
///
/// Expected to sum to roughly 1; not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyWeights {
    pub cost: f64,
    pub speed: f64,
    pub quality: f64,
    pub availability: f64,
}

impl StrategyWeights {
    pub fn sum(&self) -> f64 {
        self.cost + self.speed + self.quality + self.availability
    }

    fn components(&self) -> [(&'static str, f64); 4] {
        [
            ("cost", self.cost),
            ("speed", self.speed),
            ("quality", self.quality),
            ("availability", self.availability),
        ]
    }
}

impl Default for StrategyWeights {
    fn default() -> Self {
        Self {
            cost: 0.25,
            speed: 0.25,
            quality: 0.25,
            availability: 0.25,
        }
    }
}

/// When a rule takes effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCondition {
    #[default]
    Always,
    PrefersLowCost,
    PrefersFast,
    PrefersExcellentQuality,
    HasMaxCost,
    HasMaxResponseTime,
    HasMinQuality,
}

impl RuleCondition {
    pub fn matches(&self, request: &RoutingRequest) -> bool {
        let preferences = request.preferences.as_ref();
        let constraints = request.constraints.as_ref();
        match self {
            Self::Always => true,
            Self::PrefersLowCost => preferences.is_some_and(|p| p.wants_low_cost()),
            Self::PrefersFast => preferences.is_some_and(|p| p.wants_fast()),
            Self::PrefersExcellentQuality => {
                preferences.is_some_and(|p| p.wants_excellent_quality())
            }
            Self::HasMaxCost => constraints.is_some_and(|c| c.max_cost.is_some()),
            Self::HasMaxResponseTime => {
                constraints.is_some_and(|c| c.max_response_time_ms.is_some())
            }
            Self::HasMinQuality => constraints.is_some_and(|c| c.min_quality.is_some()),
        }
    }
}

/// What a rule does to the candidate list
///
/// Filters with no parameter take their limit from the request constraints
/// and do nothing when the request has none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleAction {
    PreferCheapest,
    PreferFastest,
    PreferHighestQuality,
    FilterByCost {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_cost: Option<f64>,
    },
    FilterByResponseTime {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_ms: Option<f64>,
    },
    FilterByQuality {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_quality: Option<f64>,
    },
    /// Move candidates at or above the availability threshold to the front
    SwitchOnLowAvailability { threshold: f64 },
}

impl RuleAction {
    /// Reject limits that would silently filter out every candidate
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Self::PreferCheapest | Self::PreferFastest | Self::PreferHighestQuality => Ok(()),
            Self::FilterByCost { max_cost: Some(limit) } => non_negative("max_cost", limit),
            Self::FilterByResponseTime { max_ms: Some(limit) } => non_negative("max_ms", limit),
            Self::FilterByQuality {
                min_quality: Some(limit),
            } => unit_interval("min_quality", limit),
            Self::FilterByCost { max_cost: None }
            | Self::FilterByResponseTime { max_ms: None }
            | Self::FilterByQuality { min_quality: None } => Ok(()),
            Self::SwitchOnLowAvailability { threshold } => {
                unit_interval("availability threshold", threshold)
            }
        }
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{} {} must be a non-negative number", name, value))
    }
}

fn unit_interval(name: &str, value: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} {} out of range", name, value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingRule {
    #[serde(default)]
    pub condition: RuleCondition,
    pub action: RuleAction,
}

impl RoutingRule {
    pub fn always(action: RuleAction) -> Self {
        Self {
            condition: RuleCondition::Always,
            action,
        }
    }

    pub fn when(condition: RuleCondition, action: RuleAction) -> Self {
        Self { condition, action }
    }
}

/// Named routing policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingStrategy {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub weights: StrategyWeights,
    /// Applied in order; each rule sees the output of the previous one
    #[serde(default)]
    pub rules: Vec<RoutingRule>,
}

impl RoutingStrategy {
    pub fn new(name: impl Into<String>, weights: StrategyWeights) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            weights,
            rules: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rule(mut self, rule: RoutingRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Reject strategies that cannot produce meaningful scores
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        for (component, weight) in self.weights.components() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("{} weight must be a non-negative number", component));
            }
        }
        if self.weights.sum() <= 0.0 {
            return Err("at least one weight must be positive".to_string());
        }
        for (index, rule) in self.rules.iter().enumerate() {
            rule.action
                .validate()
                .map_err(|e| format!("rule {}: {}", index, e))?;
        }
        Ok(())
    }
}
