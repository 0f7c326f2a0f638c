//! Vector store adapters.
//!
//! - `postgres`: pgvector, similarity computed in the database
//! - `sqlite`: f32 BLOB rows scanned and ranked in process
//! - `memory`: process-local, for tests and demos

pub mod memory;
pub mod postgres;
pub mod sqlite;

pub use memory::InMemoryVectorStore;
pub use postgres::PgVectorStore;
pub use sqlite::SqliteVectorStore;

use std::future::Future;
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::StoreConfig;
use crate::domain::ports::check_dimension;

/// Longest identifier Postgres accepts without truncation.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Table and column names, validated once so they can be spliced into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlIdentifiers {
    pub table: String,
    pub content: String,
    pub embedding: String,
    pub id: String,
}

impl SqlIdentifiers {
    pub fn from_config(config: &StoreConfig) -> DomainResult<Self> {
        Ok(Self {
            table: validate_identifier(&config.table)?,
            content: validate_identifier(&config.content_column)?,
            embedding: validate_identifier(&config.embedding_column)?,
            id: validate_identifier(&config.id_column)?,
        })
    }
}

/// Accept only plain SQL identifiers: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_identifier(name: &str) -> DomainResult<String> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest || name.len() > MAX_IDENTIFIER_LEN {
        return Err(DomainError::ValidationFailed(format!(
            "invalid SQL identifier: {name:?}"
        )));
    }
    Ok(name.to_string())
}

/// Vectors written to a store must match its dimension and have a direction.
pub(crate) fn check_storable(vector: &[f32], dimension: usize) -> DomainResult<()> {
    check_dimension(vector, dimension)?;
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(DomainError::ValidationFailed(
            "embedding contains non-finite values".to_string(),
        ));
    }
    if vector.iter().all(|v| *v == 0.0) {
        return Err(DomainError::ValidationFailed(
            "zero-magnitude embeddings cannot be stored".to_string(),
        ));
    }
    Ok(())
}

/// Bound a store call by `limit`, mapping expiry to `StoreUnavailable`.
pub(crate) async fn with_timeout<T, F>(limit: Duration, operation: &str, fut: F) -> DomainResult<T>
where
    F: Future<Output = DomainResult<T>>,
{
    tokio::time::timeout(limit, fut).await.map_err(|_| {
        DomainError::StoreUnavailable(format!("{operation} timed out after {limit:?}"))
    })?
}
