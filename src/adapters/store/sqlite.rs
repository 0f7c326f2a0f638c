//! SQLite vector store.
//!
//! Embeddings are stored as little-endian f32 BLOBs. `nearest` scans every
//! row in id order and ranks in process, which is exact and fine for the
//! document counts this store is meant for.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::{check_storable, with_timeout, SqlIdentifiers};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{cosine_similarity, rank_candidates, NewDocument, ScoredDocument, StoreConfig};
use crate::domain::ports::{check_dimension, validate_top_k, VectorStore};

/// Serialize an embedding to bytes for storage.
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Deserialize an embedding from stored bytes.
pub fn bytes_to_embedding(bytes: &[u8]) -> DomainResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(DomainError::StoreUnavailable(format!(
            "invalid embedding blob length: {}",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

fn ensure_database_directory(database_url: &str) -> DomainResult<()> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);

    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::StoreUnavailable(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
    }
    Ok(())
}

/// Vector store over a single SQLite table.
pub struct SqliteVectorStore {
    pool: SqlitePool,
    ids: SqlIdentifiers,
    dimension: usize,
    query_timeout: Duration,
}

impl SqliteVectorStore {
    /// Open (creating if missing) the database at `config.url`.
    pub async fn connect(config: &StoreConfig, dimension: usize) -> DomainResult<Self> {
        let ids = SqlIdentifiers::from_config(config)?;
        ensure_database_directory(&config.url)?;

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DomainError::ValidationFailed(format!("invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(
            pool,
            ids,
            dimension,
            Duration::from_secs(config.query_timeout_secs),
        ))
    }

    pub const fn from_pool(
        pool: SqlitePool,
        ids: SqlIdentifiers,
        dimension: usize,
        query_timeout: Duration,
    ) -> Self {
        Self {
            pool,
            ids,
            dimension,
            query_timeout,
        }
    }

    async fn scan(&self, query_vector: &[f32]) -> DomainResult<Vec<ScoredDocument>> {
        let SqlIdentifiers {
            table,
            content,
            embedding,
            id,
        } = &self.ids;
        let sql = format!("SELECT {content}, {embedding} FROM {table} ORDER BY {id}");

        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
        drop(conn);

        let mut candidates = Vec::with_capacity(rows.len());
        for row in rows {
            let text: String = row.try_get(0)?;
            let blob: Vec<u8> = row.try_get(1)?;
            let stored = bytes_to_embedding(&blob)?;
            check_dimension(&stored, self.dimension)?;
            let similarity = cosine_similarity(query_vector, &stored).unwrap_or(0.0);
            candidates.push(ScoredDocument::new(text, similarity));
        }
        Ok(candidates)
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn nearest(&self, query_vector: &[f32], k: usize) -> DomainResult<Vec<ScoredDocument>> {
        validate_top_k(k)?;
        check_dimension(query_vector, self.dimension)?;

        let candidates = with_timeout(self.query_timeout, "nearest", self.scan(query_vector)).await?;
        debug!(scanned = candidates.len(), k, "sqlite scan finished");
        Ok(rank_candidates(candidates, k))
    }

    async fn insert(&self, document: &NewDocument) -> DomainResult<i64> {
        check_storable(&document.embedding, self.dimension)?;

        let SqlIdentifiers {
            table,
            content,
            embedding,
            ..
        } = &self.ids;
        let sql = format!(
            "INSERT INTO {table} ({content}, {embedding}, created_at) VALUES (?, ?, ?)"
        );

        with_timeout(self.query_timeout, "insert", async {
            let mut conn = self.pool.acquire().await?;
            let result = sqlx::query(&sql)
                .bind(&document.content)
                .bind(embedding_to_bytes(&document.embedding))
                .bind(Utc::now().to_rfc3339())
                .execute(&mut *conn)
                .await?;
            Ok::<_, DomainError>(result.last_insert_rowid())
        })
        .await
    }

    async fn count(&self) -> DomainResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.ids.table);
        with_timeout(self.query_timeout, "count", async {
            let mut conn = self.pool.acquire().await?;
            let count: i64 = sqlx::query_scalar(&sql).fetch_one(&mut *conn).await?;
            Ok::<_, DomainError>(usize::try_from(count).unwrap_or(0))
        })
        .await
    }

    async fn ensure_schema(&self) -> DomainResult<()> {
        let SqlIdentifiers {
            table,
            content,
            embedding,
            id,
        } = &self.ids;
        let sql = format!(
            r"
            CREATE TABLE IF NOT EXISTS {table} (
                {id} INTEGER PRIMARY KEY AUTOINCREMENT,
                {content} TEXT NOT NULL,
                {embedding} BLOB NOT NULL,
                created_at TEXT NOT NULL
            )
            "
        );

        let mut conn = self.pool.acquire().await?;
        sqlx::query(&sql).execute(&mut *conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_serialization() {
        let embedding = vec![0.1_f32, -2.5, 3.0];
        let bytes = embedding_to_bytes(&embedding);
        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes_to_embedding(&bytes).unwrap(), embedding);
    }

    #[test]
    fn test_invalid_blob_length() {
        assert!(matches!(
            bytes_to_embedding(&[0, 1, 2]),
            Err(DomainError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_database_directory_for_memory_url() {
        assert!(ensure_database_directory("sqlite::memory:").is_ok());
    }

    #[tokio::test]
    async fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            url: format!("sqlite://{}", dir.path().join("nested/store.db").display()),
            ..Default::default()
        };
        let store = SqliteVectorStore::connect(&config, 2).await.unwrap();
        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();

        let first = store.insert(&NewDocument::new("a", vec![1.0, 0.0])).await.unwrap();
        let second = store.insert(&NewDocument::new("b", vec![0.0, 1.0])).await.unwrap();
        assert!(second > first);
        assert_eq!(store.count().await.unwrap(), 2);

        let results = store.nearest(&[0.0, 1.0], 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "b");
        assert!((results[0].similarity - 1.0).abs() < 1e-6);
    }
}
