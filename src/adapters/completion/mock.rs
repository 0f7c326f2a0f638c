//! Mock completion provider for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::CompletionProvider;

/// Mock response configuration.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Echo the prompt back.
    Echo,
    /// Fail with `CompletionUnavailable`.
    Fail(String),
}

/// Mock completion provider that records every prompt it receives.
pub struct MockCompletionProvider {
    reply: RwLock<MockReply>,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl MockCompletionProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply: RwLock::new(reply),
            prompts: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockReply::Text(text.into()))
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::new(MockReply::Fail(reason.into()))
    }

    pub async fn set_reply(&self, reply: MockReply) {
        *self.reply.write().await = reply;
    }

    /// Prompts received so far, oldest first.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.prompts.read().await.len()
    }
}

impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self::new(MockReply::Echo)
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> DomainResult<String> {
        self.prompts.write().await.push(prompt.to_string());
        match &*self.reply.read().await {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Echo => Ok(prompt.to_string()),
            MockReply::Fail(reason) => Err(DomainError::CompletionUnavailable(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_prompts() {
        let mock = MockCompletionProvider::replying("ok");
        assert_eq!(mock.complete("first").await.unwrap(), "ok");
        assert_eq!(mock.complete("second").await.unwrap(), "ok");
        assert_eq!(mock.prompts().await, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failing_and_reconfigure() {
        let mock = MockCompletionProvider::failing("down");
        assert!(matches!(
            mock.complete("p").await,
            Err(DomainError::CompletionUnavailable(_))
        ));
        mock.set_reply(MockReply::Echo).await;
        assert_eq!(mock.complete("p").await.unwrap(), "p");
        assert_eq!(mock.call_count().await, 2);
    }
}
