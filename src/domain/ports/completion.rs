//! Completion port - interface for text-generation backends.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Trait for completion service implementations.
///
/// A completion service is an opaque endpoint that turns a prompt into
/// generated text. It may take a long time; failures come back as
/// `DomainError::CompletionUnavailable`, never as a panic.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g., "ollama", "mock").
    fn name(&self) -> &'static str;

    /// Model identifier sent to the endpoint.
    fn model(&self) -> &str;

    /// Generate a completion for `prompt`.
    async fn complete(&self, prompt: &str) -> DomainResult<String>;
}
