//! Vector store port.
//!
//! A vector store persists `(content, embedding)` pairs and answers
//! nearest-neighbour queries under cosine similarity.

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{NewDocument, ScoredDocument};

/// Storage backend for document embeddings with similarity search.
///
/// Read calls acquire their own connection and release it before returning,
/// on success and on every error path, so one store can serve concurrent
/// readers without sharing a mutable connection.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Backend name (e.g., "postgres", "sqlite", "memory").
    fn name(&self) -> &'static str;

    /// Dimension every stored and queried vector must have.
    fn dimension(&self) -> usize;

    /// Return the `k` stored documents most similar to `query_vector`.
    ///
    /// Results are ordered by non-increasing similarity with ties broken by
    /// insertion order, and hold `min(k, count)` items. `k == 0` is an
    /// input error, not an empty result.
    async fn nearest(&self, query_vector: &[f32], k: usize) -> DomainResult<Vec<ScoredDocument>>;

    /// Append a document. Returns the backend's row id.
    async fn insert(&self, document: &NewDocument) -> DomainResult<i64>;

    /// Number of stored documents.
    async fn count(&self) -> DomainResult<usize>;

    /// Create the backing table (and extensions) when missing. Idempotent.
    async fn ensure_schema(&self) -> DomainResult<()>;
}

/// Reject `k == 0` before any backend work happens.
pub fn validate_top_k(k: usize) -> DomainResult<()> {
    if k == 0 {
        return Err(DomainError::InvalidTopK(k));
    }
    Ok(())
}

/// Reject vectors whose length differs from the store dimension.
pub fn check_dimension(vector: &[f32], expected: usize) -> DomainResult<()> {
    if vector.len() != expected {
        return Err(DomainError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(())
}
