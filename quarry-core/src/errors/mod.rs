//! Error types for all Quarry subsystems.
//!
//! Each subsystem has its own `thiserror` enum; `QuarryError` is the
//! top-level type surfaced to callers, with a stable machine code and a
//! retryability hint per variant.

mod backend_error;
mod embedding_error;
mod feedback_error;
mod ranking_error;

pub use backend_error::BackendError;
pub use embedding_error::EmbeddingError;
pub use feedback_error::FeedbackError;
pub use ranking_error::RankingError;

use std::time::Duration;

/// Convenience alias used across the workspace.
pub type QuarryResult<T> = Result<T, QuarryError>;

/// Top-level error surfaced by the search pipeline.
#[derive(Debug, thiserror::Error)]
pub enum QuarryError {
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("search backend unavailable: {reason}")]
    BackendUnavailable { reason: String },

    #[error("search backend overloaded, request rejected")]
    BackendOverloaded,

    #[error("embedding service unavailable: {reason}")]
    EmbeddingUnavailable { reason: String },

    #[error("ranking invariant violated for document {document_id}: {detail}")]
    RankingInvariantViolated { document_id: String, detail: String },

    #[error("configuration invalid: {reason}")]
    ConfigInvalid { reason: String },

    #[error("request cancelled or deadline exceeded")]
    Cancelled,
}

impl QuarryError {
    /// Stable machine code for the wire.
    pub fn code(&self) -> &'static str {
        match self {
            QuarryError::InvalidQuery { .. } => "invalid_query",
            QuarryError::BackendUnavailable { .. } => "backend_unavailable",
            QuarryError::BackendOverloaded => "backend_overloaded",
            QuarryError::EmbeddingUnavailable { .. } => "embedding_unavailable",
            QuarryError::RankingInvariantViolated { .. } => "ranking_invariant_violated",
            QuarryError::ConfigInvalid { .. } => "config_invalid",
            QuarryError::Cancelled => "cancelled",
        }
    }

    /// Whether the caller may retry the same request.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            QuarryError::BackendUnavailable { .. }
                | QuarryError::BackendOverloaded
                | QuarryError::EmbeddingUnavailable { .. }
        )
    }

    /// Suggested wait before retrying, when retryable.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            QuarryError::BackendOverloaded => Some(Duration::from_secs(1)),
            QuarryError::BackendUnavailable { .. } => Some(Duration::from_secs(5)),
            _ => None,
        }
    }
}

impl From<BackendError> for QuarryError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Overloaded => QuarryError::BackendOverloaded,
            BackendError::InvalidFilter { reason } => QuarryError::InvalidQuery { reason },
            other => QuarryError::BackendUnavailable {
                reason: other.to_string(),
            },
        }
    }
}

impl From<EmbeddingError> for QuarryError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            // A dimension mismatch is a deployment problem, not a transient one.
            EmbeddingError::DimensionMismatch { expected, actual } => QuarryError::ConfigInvalid {
                reason: format!("embedding dimension mismatch: expected {expected}, got {actual}"),
            },
            other => QuarryError::EmbeddingUnavailable {
                reason: other.to_string(),
            },
        }
    }
}

impl From<RankingError> for QuarryError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::NonFinite {
                document_id,
                factor,
            } => QuarryError::RankingInvariantViolated {
                document_id,
                detail: format!("non-finite value in factor {factor}"),
            },
            RankingError::OutOfBounds {
                document_id,
                factor,
                value,
            } => QuarryError::RankingInvariantViolated {
                document_id,
                detail: format!("factor {factor} out of [0,1]: {value}"),
            },
        }
    }
}

impl From<FeedbackError> for QuarryError {
    fn from(err: FeedbackError) -> Self {
        QuarryError::InvalidQuery {
            reason: err.to_string(),
        }
    }
}
