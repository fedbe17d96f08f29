//! Router error types
//!
//! Errors surfaced by routing operations. Backend failures are carried
//! through unmodified when they are the final outcome.

use crate::core::backend::BackendError;

/// Router error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum RouterError {
    /// No candidate survived filtering
    #[error("No service available for request {request_id}: {reason}")]
    NoServiceAvailable { request_id: String, reason: String },

    /// Primary failed and there was nothing to fall back to
    #[error("All fallbacks failed for request {request_id}")]
    AllFallbacksFailed {
        request_id: String,
        #[source]
        original: BackendError,
    },

    /// Racing mode: every participant failed and the single-candidate
    /// escalation failed as well
    #[error("All candidates failed for request {request_id}")]
    AllCandidatesFailed {
        request_id: String,
        #[source]
        source: Box<RouterError>,
    },

    #[error("Unknown routing strategy: {0}")]
    UnknownStrategy(String),

    #[error("Invalid routing strategy {name}: {reason}")]
    InvalidStrategy { name: String, reason: String },

    /// Originating backend error, passed through unmodified
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl RouterError {
    pub fn no_service(request_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoServiceAvailable {
            request_id: request_id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_strategy(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStrategy {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Backend error at the root of this failure, if any
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            Self::Backend(err) | Self::AllFallbacksFailed { original: err, .. } => Some(err),
            Self::AllCandidatesFailed { source, .. } => source.backend_error(),
            _ => None,
        }
    }

    /// Configuration-class errors are never worth retrying
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownStrategy(_) | Self::InvalidStrategy { .. } | Self::NoServiceAvailable { .. }
        )
    }
}

pub type RouterResult<T> = std::result::Result<T, RouterError>;
