//! Strand - retrieval-augmented question answering
//!
//! Strand answers questions from a document store: the question is embedded,
//! the nearest stored documents are retrieved from a vector store, and a
//! local completion model answers from that context.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors, and the port traits
//!   (`EmbeddingProvider`, `VectorStore`, `CompletionProvider`)
//! - **Adapters** (`adapters`): Ollama/OpenAI/hashing embeddings, pgvector,
//!   SQLite and in-memory stores, Ollama and mock completion
//! - **Service Layer** (`services`): `Retriever`, `Agent`, `Ingestor`
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging,
//!   HTTP retry plumbing, component wiring
//! - **CLI Layer** (`cli`): the `strand` command
//!
//! # Example
//!
//! ```ignore
//! use strand::domain::models::Config;
//! use strand::infrastructure::setup::build_agent;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let agent = build_agent(&Config::default()).await?;
//!     println!("{}", agent.run("What is DeepSeek?").await);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{AgentOutcome, Config, NewDocument, PromptTemplate, ScoredDocument};
pub use domain::ports::{CompletionProvider, EmbeddingProvider, VectorStore};
pub use services::{Agent, Ingestor, Retriever};
