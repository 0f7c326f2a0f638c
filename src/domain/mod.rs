//! Domain layer for the retrieval-and-generation pipeline
//!
//! Pure models, errors and the port traits adapters implement. Nothing here
//! performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
