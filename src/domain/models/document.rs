//! Document models
//!
//! A document is a piece of text plus its embedding. Documents are written once
//! by ingestion and only read by retrieval.

use serde::{Deserialize, Serialize};

/// A document waiting to be inserted into a vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    /// Text content returned to callers on retrieval
    pub content: String,
    /// Embedding of `content`, same dimension as the store
    pub embedding: Vec<f32>,
}

impl NewDocument {
    pub fn new(content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            content: content.into(),
            embedding,
        }
    }
}

/// A stored document's content with its similarity to a query vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// Document content
    pub content: String,
    /// Cosine similarity to the query, in `[-1, 1]`
    pub similarity: f32,
}

impl ScoredDocument {
    pub fn new(content: impl Into<String>, similarity: f32) -> Self {
        Self {
            content: content.into(),
            similarity,
        }
    }
}

/// Sort scored candidates most-similar first, truncating to `k`.
///
/// Candidates must arrive in insertion order; the sort is stable, so equal
/// similarities keep that order.
pub fn rank_candidates(mut candidates: Vec<ScoredDocument>, k: usize) -> Vec<ScoredDocument> {
    candidates.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    candidates.truncate(k);
    candidates
}
