//! Application services

pub mod agent;
pub mod ingestion;
pub mod retriever;

pub use agent::{Agent, DEFAULT_COMPLETION_TIMEOUT};
pub use ingestion::{split_documents, IngestReport, Ingestor, SAMPLE_DOCUMENTS};
pub use retriever::{Retriever, DEFAULT_EMBED_TIMEOUT};
