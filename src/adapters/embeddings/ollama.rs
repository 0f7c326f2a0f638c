//! Ollama embedding provider adapter.
//!
//! Calls `POST {base_url}/api/embed` with `{model, input: [..]}` and reads
//! `{embeddings: [[..]]}`. The default model, `all-minilm`, is
//! all-MiniLM-L6-v2 (384 dimensions).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{embed_in_chunks, unavailable};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{validate_embedding, EmbeddingConfig};
use crate::domain::ports::EmbeddingProvider;
use crate::infrastructure::http::{build_client, send_json, RetryPolicy};

/// Configuration for the Ollama embedding provider.
#[derive(Debug, Clone)]
pub struct OllamaEmbeddingConfig {
    /// Server root, e.g. `http://localhost:11434`.
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
    pub timeout_secs: u64,
    pub max_batch_size: usize,
}

impl From<&EmbeddingConfig> for OllamaEmbeddingConfig {
    fn from(config: &EmbeddingConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimension: config.dimension,
            timeout_secs: config.timeout_secs,
            max_batch_size: config.max_batch_size.max(1),
        }
    }
}

impl Default for OllamaEmbeddingConfig {
    fn default() -> Self {
        Self::from(&EmbeddingConfig::default())
    }
}

/// Embedding provider backed by a local Ollama server.
pub struct OllamaEmbeddingProvider {
    config: OllamaEmbeddingConfig,
    client: Client,
    retry: RetryPolicy,
}

impl OllamaEmbeddingProvider {
    pub fn new(config: OllamaEmbeddingConfig, retry: RetryPolicy) -> DomainResult<Self> {
        let client = build_client(config.timeout_secs)
            .map_err(|e| DomainError::ValidationFailed(format!("HTTP client: {e}")))?;
        Ok(Self {
            config,
            client,
            retry,
        })
    }

    async fn call_embed_api(&self, texts: Vec<String>) -> DomainResult<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.config.base_url);
        let expected = texts.len();
        let request_body = EmbedRequest {
            model: &self.config.model,
            input: texts,
        };

        let response: EmbedResponse = self
            .retry
            .execute("ollama.embed", || {
                send_json(self.client.post(&url).json(&request_body))
            })
            .await
            .map_err(|e| unavailable("ollama", &e))?;

        if response.embeddings.len() != expected {
            return Err(DomainError::EmbeddingUnavailable(format!(
                "expected {expected} embeddings, got {}",
                response.embeddings.len()
            )));
        }

        for vector in &response.embeddings {
            validate_embedding(vector, self.config.dimension)?;
        }

        debug!(model = %self.config.model, count = expected, "ollama embeddings received");
        Ok(response.embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        self.call_embed_api(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::EmbeddingUnavailable("Empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        embed_in_chunks(texts, self.config.max_batch_size, |chunk| {
            self.call_embed_api(chunk)
        })
        .await
    }

    fn max_batch_size(&self) -> usize {
        self.config.max_batch_size
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_embedding_config() {
        let config = OllamaEmbeddingConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "all-minilm");
        assert_eq!(config.dimension, 384);
    }

    #[test]
    fn test_request_shape() {
        let body = EmbedRequest {
            model: "all-minilm",
            input: vec!["hello".to_string()],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "all-minilm");
        assert_eq!(json["input"][0], "hello");
    }
}
