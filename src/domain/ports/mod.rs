//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that adapters implement:
//! - `EmbeddingProvider`: text to fixed-length vector
//! - `VectorStore`: nearest-neighbour lookup and the ingestion write path
//! - `CompletionProvider`: prompt to generated text

pub mod completion;
pub mod embedding;
pub mod vector_store;

pub use completion::CompletionProvider;
pub use embedding::EmbeddingProvider;
pub use vector_store::{check_dimension, validate_top_k, VectorStore};
