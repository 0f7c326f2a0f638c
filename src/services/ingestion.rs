//! Ingestion service
//!
//! Embeds texts and appends them to a vector store. Embedding runs a few
//! batches ahead with bounded concurrency; inserts stay sequential so row ids
//! follow input order, which is what retrieval uses to break ties.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::NewDocument;
use crate::domain::ports::{EmbeddingProvider, VectorStore};

/// The documents loaded by `strand seed`.
pub const SAMPLE_DOCUMENTS: [&str; 3] = [
    "Strand Agents is an AI framework for RAG.",
    "DeepSeek is a local LLM server.",
    "This agent retrieves from Postgres and uses DeepSeek to answer.",
];

/// Upper bound on texts sent in one embedding request during ingestion.
const MAX_INGEST_BATCH: usize = 32;

/// Embedding requests allowed in flight at once.
const DEFAULT_CONCURRENCY: usize = 4;

/// Summary of an ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Row ids of inserted documents, in input order.
    pub inserted_ids: Vec<i64>,
    /// Texts that could not be embedded or stored.
    pub failed: usize,
    /// First failure message, if any.
    pub first_error: Option<String>,
}

impl IngestReport {
    pub fn inserted(&self) -> usize {
        self.inserted_ids.len()
    }

    fn record_failure(&mut self, count: usize, err: &DomainError) {
        self.failed += count;
        if self.first_error.is_none() {
            self.first_error = Some(err.to_string());
        }
    }
}

/// Split raw file contents into documents.
///
/// Whole-file mode yields the trimmed contents as one document; line mode
/// yields every non-blank trimmed line. Blank input yields nothing.
pub fn split_documents(text: &str, per_line: bool) -> Vec<String> {
    if per_line {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect()
    } else {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        }
    }
}

/// Embeds and stores documents.
pub struct Ingestor {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    concurrency: usize,
}

impl Ingestor {
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
            concurrency: DEFAULT_CONCURRENCY,
        })
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn ingest(&self, texts: Vec<String>) -> IngestReport {
        self.ingest_with_progress(texts, |_| {}).await
    }

    /// Ingest `texts`, calling `on_progress` with the number of texts handled
    /// after each batch.
    #[instrument(skip_all, fields(documents = texts.len(), store = self.store.name()))]
    pub async fn ingest_with_progress<P>(&self, texts: Vec<String>, on_progress: P) -> IngestReport
    where
        P: Fn(usize),
    {
        let batch_size = self.embedder.max_batch_size().clamp(1, MAX_INGEST_BATCH);
        let batches: Vec<Vec<String>> = texts.chunks(batch_size).map(<[String]>::to_vec).collect();

        let embedder = &self.embedder;
        let mut embedded = stream::iter(batches)
            .map(|batch| async move {
                let vectors = embedder.embed_batch(&batch).await;
                (batch, vectors)
            })
            .buffered(self.concurrency);

        let mut report = IngestReport::default();
        while let Some((batch, vectors)) = embedded.next().await {
            match vectors {
                Ok(vectors) if vectors.len() == batch.len() => {
                    for (content, embedding) in batch.iter().zip(vectors) {
                        match self.store.insert(&NewDocument::new(content.clone(), embedding)).await {
                            Ok(id) => report.inserted_ids.push(id),
                            Err(err) => {
                                warn!(error_kind = err.kind(), error = %err, "insert failed");
                                report.record_failure(1, &err);
                            }
                        }
                    }
                }
                Ok(vectors) => {
                    let err = DomainError::EmbeddingUnavailable(format!(
                        "expected {} embeddings, got {}",
                        batch.len(),
                        vectors.len()
                    ));
                    warn!(error = %err, "embedding batch incomplete");
                    report.record_failure(batch.len(), &err);
                }
                Err(err) => {
                    warn!(error_kind = err.kind(), error = %err, batch = batch.len(), "embedding batch failed");
                    report.record_failure(batch.len(), &err);
                }
            }
            on_progress(batch.len());
        }

        info!(inserted = report.inserted(), failed = report.failed, "ingestion finished");
        report
    }
}
