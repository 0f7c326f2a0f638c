//! Common test utilities for integration tests
//!
//! Provides stub collaborators and fixture builders shared across the
//! integration test files.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use strand::adapters::store::InMemoryVectorStore;
use strand::domain::errors::{DomainError, DomainResult};
use strand::domain::models::{NewDocument, ScoredDocument};
use strand::domain::ports::{CompletionProvider, EmbeddingProvider, VectorStore};

/// Embedder that maps known texts to fixed vectors and fails on anything else.
pub struct StaticEmbeddingProvider {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl StaticEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        assert_eq!(vector.len(), self.dimension, "fixture vector has wrong length");
        self.vectors.insert(text.to_string(), vector);
        self
    }
}

#[async_trait]
impl EmbeddingProvider for StaticEmbeddingProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| DomainError::EmbeddingUnavailable(format!("no fixture for {text:?}")))
    }
}

/// Store whose every call fails as if the database were unreachable.
pub struct UnreachableStore {
    pub dimension: usize,
}

#[async_trait]
impl VectorStore for UnreachableStore {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn nearest(&self, _query_vector: &[f32], _k: usize) -> DomainResult<Vec<ScoredDocument>> {
        Err(DomainError::StoreUnavailable("connection refused".to_string()))
    }

    async fn insert(&self, _document: &NewDocument) -> DomainResult<i64> {
        Err(DomainError::StoreUnavailable("connection refused".to_string()))
    }

    async fn count(&self) -> DomainResult<usize> {
        Err(DomainError::StoreUnavailable("connection refused".to_string()))
    }

    async fn ensure_schema(&self) -> DomainResult<()> {
        Err(DomainError::StoreUnavailable("connection refused".to_string()))
    }
}

/// Embedder that sleeps for `delay` before answering with a fixed vector.
pub struct SlowEmbeddingProvider {
    pub vector: Vec<f32>,
    pub delay: Duration,
}

#[async_trait]
impl EmbeddingProvider for SlowEmbeddingProvider {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn dimension(&self) -> usize {
        self.vector.len()
    }

    async fn embed(&self, _text: &str) -> DomainResult<Vec<f32>> {
        tokio::time::sleep(self.delay).await;
        Ok(self.vector.clone())
    }
}

/// Completion service that sleeps for `delay` before replying.
pub struct SlowCompletionProvider {
    pub reply: String,
    pub delay: Duration,
}

#[async_trait]
impl CompletionProvider for SlowCompletionProvider {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn model(&self) -> &str {
        "slow-model"
    }

    async fn complete(&self, _prompt: &str) -> DomainResult<String> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }
}

/// Unit vector along `axis`.
pub fn axis(dimension: usize, axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; dimension];
    v[axis] = 1.0;
    v
}

/// In-memory store pre-filled with `(content, vector)` pairs, in order.
pub async fn memory_store(dimension: usize, docs: &[(&str, Vec<f32>)]) -> Arc<InMemoryVectorStore> {
    let store = Arc::new(InMemoryVectorStore::new(dimension));
    for (content, vector) in docs {
        store
            .insert(&NewDocument::new(*content, vector.clone()))
            .await
            .expect("fixture insert failed");
    }
    store
}

/// Setup test logging
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
