//! Error types for the crate
//!
//! `RoutewiseError` covers everything outside the routing hot path
//! (configuration, IO, parsing) and wraps `RouterError` so callers can use a
//! single `Result` alias end to end.

use crate::core::router::error::RouterError;
use thiserror::Error;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, RoutewiseError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum RoutewiseError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(String),

    /// Routing errors
    #[error(transparent)]
    Router(#[from] RouterError),
}

impl RoutewiseError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn logging<S: Into<String>>(message: S) -> Self {
        Self::Logging(message.into())
    }

    /// True when the underlying cause is a routing error
    pub fn is_routing(&self) -> bool {
        matches!(self, Self::Router(_))
    }
}
