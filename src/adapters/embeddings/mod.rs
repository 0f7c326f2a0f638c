//! Embedding provider adapters.
//!
//! - `ollama`: local Ollama server (`/api/embed`), default all-MiniLM
//! - `openai`: OpenAI-compatible `/embeddings` endpoints
//! - `hashing`: deterministic offline feature hashing

pub mod hashing;
pub mod ollama;
pub mod openai;

pub use hashing::HashingEmbeddingProvider;
pub use ollama::{OllamaEmbeddingConfig, OllamaEmbeddingProvider};
pub use openai::{OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};

use std::future::Future;

use crate::domain::errors::{DomainError, DomainResult};
use crate::infrastructure::http::HttpCallError;

fn unavailable(provider: &str, err: &HttpCallError) -> DomainError {
    DomainError::EmbeddingUnavailable(format!("{provider} embedding request failed: {err}"))
}

/// Split `texts` into requests of at most `max_batch_size` items and
/// concatenate the results in input order.
async fn embed_in_chunks<F, Fut>(
    texts: &[String],
    max_batch_size: usize,
    call: F,
) -> DomainResult<Vec<Vec<f32>>>
where
    F: Fn(Vec<String>) -> Fut,
    Fut: Future<Output = DomainResult<Vec<Vec<f32>>>>,
{
    let mut all = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(max_batch_size.max(1)) {
        all.extend(call(chunk.to_vec()).await?);
    }
    Ok(all)
}
