//! Ollama completion adapter.
//!
//! Sends a non-streaming `POST /api/generate` request and returns the
//! `response` field of the reply. The default model is `deepseek-r1:7b`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::CompletionConfig;
use crate::domain::ports::CompletionProvider;
use crate::infrastructure::http::{build_client, send_json, RetryPolicy};

/// Configuration for the Ollama completion provider.
#[derive(Debug, Clone)]
pub struct OllamaCompletionConfig {
    /// Full generate endpoint, e.g. `http://localhost:11434/api/generate`.
    pub url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl From<&CompletionConfig> for OllamaCompletionConfig {
    fn from(config: &CompletionConfig) -> Self {
        Self {
            url: config.url.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

impl Default for OllamaCompletionConfig {
    fn default() -> Self {
        Self::from(&CompletionConfig::default())
    }
}

/// Completion provider backed by Ollama's generate endpoint.
pub struct OllamaCompletionProvider {
    config: OllamaCompletionConfig,
    client: Client,
    retry: RetryPolicy,
}

impl OllamaCompletionProvider {
    pub fn new(config: OllamaCompletionConfig, retry: RetryPolicy) -> DomainResult<Self> {
        let client = build_client(config.timeout_secs)
            .map_err(|e| DomainError::ValidationFailed(format!("HTTP client: {e}")))?;
        Ok(Self {
            config,
            client,
            retry,
        })
    }
}

#[async_trait]
impl CompletionProvider for OllamaCompletionProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> DomainResult<String> {
        let request_body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let response: GenerateResponse = self
            .retry
            .execute("ollama.generate", || {
                send_json(self.client.post(&self.config.url).json(&request_body))
            })
            .await
            .map_err(|e| DomainError::CompletionUnavailable(e.to_string()))?;

        debug!(answer_len = response.response.len(), "completion received");
        Ok(response.response)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Reply body. A reply without `response` yields an empty answer.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}
