//! Domain errors for the retrieval-and-generation pipeline.

use thiserror::Error;

/// Domain-level errors that can occur in the pipeline.
///
/// The three `*Unavailable` variants correspond to the three collaborators a
/// single `run` touches; everything else is an input or invariant violation.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Vector store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Completion unavailable: {0}")]
    CompletionUnavailable(String),

    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DomainError {
    /// Short, stable name of the error kind, used as a structured log field.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EmbeddingUnavailable(_) => "embedding_unavailable",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::CompletionUnavailable(_) => "completion_unavailable",
            Self::InvalidTopK(_) => "invalid_top_k",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::ValidationFailed(_) => "validation_failed",
            Self::SerializationError(_) => "serialization_error",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
