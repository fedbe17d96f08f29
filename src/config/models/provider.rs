//! Provider and model configuration

use super::default_true;
use serde::{Deserialize, Serialize};

/// Static quality tier from model metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Basic,
    #[default]
    Good,
    Excellent,
}

impl QualityTier {
    /// Quality score in [0, 1] used for ranking
    pub fn score(self) -> f64 {
        match self {
            QualityTier::Basic => 0.6,
            QualityTier::Good => 0.8,
            QualityTier::Excellent => 1.0,
        }
    }
}

/// Static speed tier from model metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedTier {
    Fast,
    #[default]
    Medium,
    Slow,
}

impl SpeedTier {
    /// Response time assumed before any call has been observed
    pub fn baseline_response_time_ms(self) -> f64 {
        match self {
            SpeedTier::Fast => 800.0,
            SpeedTier::Medium => 2000.0,
            SpeedTier::Slow => 5000.0,
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name as understood by the backend
    pub name: String,
    /// Cost per token in dollars
    #[serde(default)]
    pub cost_per_token: f64,
    /// Quality tier
    #[serde(default)]
    pub quality: QualityTier,
    /// Speed tier
    #[serde(default)]
    pub speed: SpeedTier,
    /// Whether the model is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ModelConfig {
    pub fn new(name: impl Into<String>, cost_per_token: f64) -> Self {
        Self {
            name: name.into(),
            cost_per_token,
            quality: QualityTier::default(),
            speed: SpeedTier::default(),
            enabled: true,
        }
    }

    pub fn with_quality(mut self, quality: QualityTier) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_speed(mut self, speed: SpeedTier) -> Self {
        self.speed = speed;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider id, also the key of its backend client
    pub id: String,
    /// Whether provider is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Models served by this provider, in preference order
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

impl ProviderConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            models: Vec::new(),
        }
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.models.push(model);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// First enabled model, used when falling back to this provider
    pub fn primary_model(&self) -> Option<&ModelConfig> {
        self.enabled_models().next()
    }

    /// Enabled models in configuration order
    pub fn enabled_models(&self) -> impl Iterator<Item = &ModelConfig> {
        self.models.iter().filter(|m| m.enabled)
    }
}
