//! OpenAI-compatible embedding adapter.
//!
//! Posts `{model, input: [..]}` to `{base_url}/embeddings` and reads
//! `{data: [{index, embedding}]}`. Works with any server that speaks this
//! shape (OpenAI, vLLM, LM Studio, llama.cpp server).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{embed_in_chunks, unavailable};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{validate_embedding, EmbeddingConfig};
use crate::domain::ports::EmbeddingProvider;
use crate::infrastructure::http::{build_client, send_json, RetryPolicy};

const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Settings for [`OpenAiEmbeddingProvider`].
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingConfig {
    /// Bearer token; `OPENAI_API_KEY` is used when unset.
    pub api_key: Option<String>,
    /// API root including the version segment, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
    pub timeout_secs: u64,
    pub max_batch_size: usize,
}

impl Default for OpenAiEmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            timeout_secs: 30,
            max_batch_size: 2048,
        }
    }
}

impl From<&EmbeddingConfig> for OpenAiEmbeddingConfig {
    fn from(config: &EmbeddingConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimension: config.dimension,
            timeout_secs: config.timeout_secs,
            max_batch_size: config.max_batch_size.max(1),
        }
    }
}

/// Embedding provider for OpenAI-compatible endpoints.
///
/// A missing key is not a construction error: local servers often need none
/// configured until the first request is refused, and a refused request is
/// reported like any other embedding outage.
pub struct OpenAiEmbeddingProvider {
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimension: usize,
    max_batch_size: usize,
    client: Client,
    retry: RetryPolicy,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiEmbeddingConfig, retry: RetryPolicy) -> DomainResult<Self> {
        let client = build_client(config.timeout_secs)
            .map_err(|e| DomainError::ValidationFailed(format!("HTTP client: {e}")))?;
        let api_key = config
            .api_key
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            endpoint: format!("{}/embeddings", config.base_url),
            api_key,
            model: config.model,
            dimension: config.dimension,
            max_batch_size: config.max_batch_size.max(1),
            client,
            retry,
        })
    }

    fn api_key(&self) -> DomainResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            DomainError::EmbeddingUnavailable(format!(
                "no API key: set embedding.api_key or {API_KEY_ENV}"
            ))
        })
    }

    async fn request(&self, texts: Vec<String>) -> DomainResult<Vec<Vec<f32>>> {
        let api_key = self.api_key()?;
        let expected = texts.len();
        let body = EmbeddingsRequest {
            model: &self.model,
            input: texts,
        };

        let response: EmbeddingsResponse = self
            .retry
            .execute("openai.embeddings", || {
                send_json(self.client.post(&self.endpoint).bearer_auth(api_key).json(&body))
            })
            .await
            .map_err(|e| unavailable("openai", &e))?;

        let vectors = response.into_ordered_vectors(expected)?;
        for vector in &vectors {
            validate_embedding(vector, self.dimension)?;
        }
        debug!(model = %self.model, count = expected, "openai embeddings received");
        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        self.request(vec![text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| DomainError::EmbeddingUnavailable("empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        embed_in_chunks(texts, self.max_batch_size, |chunk| self.request(chunk)).await
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

impl EmbeddingsResponse {
    /// Vectors in request order. Servers may answer out of order.
    fn into_ordered_vectors(self, expected: usize) -> DomainResult<Vec<Vec<f32>>> {
        let mut items = self.data;
        if items.len() != expected {
            return Err(DomainError::EmbeddingUnavailable(format!(
                "expected {expected} embeddings, got {}",
                items.len()
            )));
        }
        items.sort_by_key(|item| item.index);
        items
            .into_iter()
            .enumerate()
            .map(|(position, item)| {
                if item.index == position {
                    Ok(item.embedding)
                } else {
                    Err(DomainError::EmbeddingUnavailable(format!(
                        "embedding indices do not cover 0..{expected}: found {} at position {position}",
                        item.index
                    )))
                }
            })
            .collect()
    }
}
