//! Agent service
//!
//! Retrieval-augmented answering: retrieve grounding documents, render them
//! into a prompt, and ask the completion service for an answer.

use std::sync::Arc;
use std::time::Duration;

use tracing::{field, info, instrument, warn, Span};
use uuid::Uuid;

use super::retriever::Retriever;
use crate::domain::errors::DomainError;
use crate::domain::models::{AgentOutcome, PromptTemplate, DEFAULT_TOP_K};
use crate::domain::ports::CompletionProvider;

/// Default bound on a single completion call.
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(600);

/// Retrieval-augmented question answering agent.
pub struct Agent {
    retriever: Retriever,
    completion: Arc<dyn CompletionProvider>,
    template: PromptTemplate,
    top_k: usize,
    completion_timeout: Duration,
}

impl Agent {
    pub fn new(retriever: Retriever, completion: Arc<dyn CompletionProvider>) -> Self {
        Self {
            retriever,
            completion,
            template: PromptTemplate::default(),
            top_k: DEFAULT_TOP_K,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Number of documents retrieved per question. Values below 1 are
    /// reported as `InvalidTopK` by the store on every run.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[must_use]
    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub const fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    pub const fn template(&self) -> PromptTemplate {
        self.template
    }

    /// Render the prompt for `query` grounded on `documents`.
    pub fn build_prompt<S: AsRef<str>>(&self, documents: &[S], query: &str) -> String {
        self.template.render(documents, query)
    }

    /// Answer `query`, reporting how the answer came about.
    #[instrument(skip(self, query), fields(request_id = %Uuid::new_v4(), outcome = field::Empty))]
    pub async fn answer(&self, query: &str) -> AgentOutcome {
        let outcome = self.answer_inner(query).await;
        Span::current().record("outcome", outcome_label(&outcome));
        outcome
    }

    async fn answer_inner(&self, query: &str) -> AgentOutcome {
        let documents = match self.retriever.try_retrieve(query, self.top_k).await {
            Ok(documents) if documents.is_empty() => {
                info!("no documents matched the query");
                return AgentOutcome::NoDocuments;
            }
            Ok(documents) => documents,
            Err(err) => {
                warn!(error_kind = err.kind(), error = %err, "retrieval failed, answering without grounding");
                return AgentOutcome::retrieval_failed(&err);
            }
        };

        let contents: Vec<String> = documents.into_iter().map(|d| d.content).collect();
        let prompt = self.build_prompt(&contents, query);
        info!(
            sources = contents.len(),
            template = %self.template,
            model = self.completion.model(),
            "calling completion service"
        );

        let completion = tokio::time::timeout(self.completion_timeout, self.completion.complete(&prompt))
            .await
            .unwrap_or_else(|_| {
                Err(DomainError::CompletionUnavailable(format!(
                    "completion timed out after {:?}",
                    self.completion_timeout
                )))
            });

        match completion {
            Ok(answer) => AgentOutcome::Answered {
                answer,
                sources: contents.len(),
            },
            Err(err) => {
                warn!(error_kind = err.kind(), error = %err, "completion failed");
                AgentOutcome::completion_failed(&err)
            }
        }
    }

    /// Answer `query` as plain text.
    ///
    /// Always yields a string: the completion text, the "no documents"
    /// message, or `Error calling LLM: ...`.
    pub async fn run(&self, query: &str) -> String {
        self.answer(query).await.into_text()
    }
}

const fn outcome_label(outcome: &AgentOutcome) -> &'static str {
    match outcome {
        AgentOutcome::Answered { .. } => "answered",
        AgentOutcome::NoDocuments => "no_documents",
        AgentOutcome::RetrievalFailed { .. } => "retrieval_failed",
        AgentOutcome::CompletionFailed { .. } => "completion_failed",
    }
}
