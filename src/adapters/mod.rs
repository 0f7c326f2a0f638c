//! Adapters implementing the domain ports

pub mod completion;
pub mod embeddings;
pub mod store;
