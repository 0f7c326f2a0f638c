//! Agent outcome model
//!
//! The agent reports what happened during a `run` as a tagged outcome, then
//! renders it to the single answer string users see. Keeping the tag lets
//! operators tell "nothing matched" apart from "the store was unreachable"
//! without changing the visible text.

use serde::Serialize;

use crate::domain::errors::DomainError;

/// Answer text when retrieval yields no grounding.
pub const NO_DOCUMENTS_MESSAGE: &str = "No relevant documents found in the database.";

/// Prefix of the answer text when the completion service fails.
pub const COMPLETION_ERROR_PREFIX: &str = "Error calling LLM: ";

/// Terminal outcome of a single agent run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AgentOutcome {
    /// The completion service produced an answer grounded on `sources` documents.
    Answered { answer: String, sources: usize },
    /// Retrieval succeeded but found nothing.
    NoDocuments,
    /// Retrieval failed; treated as "no grounding available".
    RetrievalFailed { kind: String, reason: String },
    /// The completion service failed.
    CompletionFailed { reason: String },
}

impl AgentOutcome {
    pub fn retrieval_failed(err: &DomainError) -> Self {
        Self::RetrievalFailed {
            kind: err.kind().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn completion_failed(err: &DomainError) -> Self {
        Self::CompletionFailed {
            reason: err.to_string(),
        }
    }

    /// Render the outcome as the user-visible answer string.
    pub fn into_text(self) -> String {
        match self {
            Self::Answered { answer, .. } => answer,
            Self::NoDocuments | Self::RetrievalFailed { .. } => NO_DOCUMENTS_MESSAGE.to_string(),
            Self::CompletionFailed { reason } => format!("{COMPLETION_ERROR_PREFIX}{reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_failure_renders_as_no_documents() {
        let outcome =
            AgentOutcome::retrieval_failed(&DomainError::StoreUnavailable("refused".into()));
        assert!(matches!(
            &outcome,
            AgentOutcome::RetrievalFailed { kind, .. } if kind == "store_unavailable"
        ));
        assert_eq!(outcome.into_text(), NO_DOCUMENTS_MESSAGE);
        assert_eq!(AgentOutcome::NoDocuments.into_text(), NO_DOCUMENTS_MESSAGE);
    }

    #[test]
    fn test_completion_failure_text() {
        let outcome = AgentOutcome::completion_failed(&DomainError::CompletionUnavailable(
            "HTTP 500".into(),
        ));
        assert_eq!(
            outcome.into_text(),
            "Error calling LLM: Completion unavailable: HTTP 500"
        );
    }

    #[test]
    fn test_serializes_with_tag() {
        let json = serde_json::to_value(AgentOutcome::Answered {
            answer: "42".into(),
            sources: 2,
        })
        .unwrap();
        assert_eq!(json["outcome"], "answered");
        assert_eq!(json["sources"], 2);
    }
}
