//! Domain models

pub mod config;
pub mod document;
pub mod embedding;
pub mod outcome;
pub mod prompt;

pub use config::{
    CompletionConfig, Config, EmbeddingConfig, EmbeddingProviderKind, LogFormat, LoggingConfig,
    RetrievalConfig, RetryConfig, RotationPolicy, StoreBackend, StoreConfig, DEFAULT_TOP_K,
};
pub use document::{rank_candidates, NewDocument, ScoredDocument};
pub use embedding::{cosine_similarity, l2_normalize, validate_embedding};
pub use outcome::{AgentOutcome, COMPLETION_ERROR_PREFIX, NO_DOCUMENTS_MESSAGE};
pub use prompt::PromptTemplate;
