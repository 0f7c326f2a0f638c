//! Completion provider adapters.

pub mod mock;
pub mod ollama;

pub use mock::{MockCompletionProvider, MockReply};
pub use ollama::{OllamaCompletionConfig, OllamaCompletionProvider};
