//! Retriever service
//!
//! Turns a query string into the contents of the most similar stored
//! documents: embed the query, then ask the vector store for its nearest
//! neighbours.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ScoredDocument;
use crate::domain::ports::{validate_top_k, EmbeddingProvider, VectorStore};

/// Default bound on a single query embedding.
pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(60);

/// Embeds queries and looks them up in a vector store.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    embed_timeout: Duration,
}

impl Retriever {
    /// Pair an embedder with a store.
    ///
    /// Fails with `DimensionMismatch` when the embedder and the store disagree
    /// on vector length, since every lookup would fail otherwise.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> DomainResult<Self> {
        if embedder.dimension() != store.dimension() {
            return Err(DomainError::DimensionMismatch {
                expected: store.dimension(),
                actual: embedder.dimension(),
            });
        }

        Ok(Self {
            embedder,
            store,
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
        })
    }

    /// Override the bound on query embedding.
    #[must_use]
    pub fn with_embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout = timeout;
        self
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Retrieve scored documents, surfacing every failure.
    #[instrument(skip(self, query), fields(store = self.store.name()))]
    pub async fn try_retrieve(&self, query: &str, top_k: usize) -> DomainResult<Vec<ScoredDocument>> {
        validate_top_k(top_k)?;

        let vector = tokio::time::timeout(self.embed_timeout, self.embedder.embed(query))
            .await
            .map_err(|_| {
                DomainError::EmbeddingUnavailable(format!(
                    "query embedding timed out after {:?}",
                    self.embed_timeout
                ))
            })??;

        let documents = self.store.nearest(&vector, top_k).await?;
        debug!(found = documents.len(), "retrieval finished");
        Ok(documents)
    }

    /// Retrieve document contents, most similar first.
    ///
    /// Never fails: embedding and store errors are logged at `warn` and
    /// yield an empty list, the same as a store with no matches.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Vec<String> {
        match self.try_retrieve(query, top_k).await {
            Ok(documents) => documents.into_iter().map(|d| d.content).collect(),
            Err(err) => {
                warn!(error_kind = err.kind(), error = %err, "retrieval failed, treating as no results");
                Vec::new()
            }
        }
    }
}
