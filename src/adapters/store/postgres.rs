//! pgvector store.
//!
//! Similarity is computed by the database with the cosine distance operator
//! `<=>`, so only the `k` winning rows cross the wire. Vectors are sent as
//! pgvector text literals (`[0.1,0.2,...]`) and cast server-side, which keeps
//! this adapter free of a pgvector client type.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use super::{check_storable, with_timeout, SqlIdentifiers};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{NewDocument, ScoredDocument, StoreConfig};
use crate::domain::ports::{check_dimension, validate_top_k, VectorStore};

/// Format a vector as a pgvector text literal.
pub fn to_pgvector_literal(vector: &[f32]) -> String {
    let mut literal = String::with_capacity(vector.len() * 10 + 2);
    literal.push('[');
    for (i, value) in vector.iter().enumerate() {
        if i > 0 {
            literal.push(',');
        }
        literal.push_str(&value.to_string());
    }
    literal.push(']');
    literal
}

/// Vector store over a Postgres table with a `vector(n)` column.
pub struct PgVectorStore {
    pool: PgPool,
    ids: SqlIdentifiers,
    dimension: usize,
    query_timeout: Duration,
}

impl PgVectorStore {
    /// Build a lazily connecting pool. No connection is opened until the
    /// first query, so an unreachable server surfaces as `StoreUnavailable`
    /// from that query rather than here.
    pub fn connect_lazy(config: &StoreConfig, dimension: usize) -> DomainResult<Self> {
        let ids = SqlIdentifiers::from_config(config)?;

        let mut options = PgConnectOptions::from_str(&config.url)
            .map_err(|e| DomainError::ValidationFailed(format!("invalid Postgres URL: {e}")))?;
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            ids,
            dimension,
            query_timeout: Duration::from_secs(config.query_timeout_secs),
        })
    }

    fn nearest_sql(&self) -> String {
        let SqlIdentifiers {
            table,
            content,
            embedding,
            id,
        } = &self.ids;
        format!(
            "SELECT {content}, (1 - ({embedding} <=> $1::vector))::float8 AS similarity \
             FROM {table} \
             ORDER BY {embedding} <=> $1::vector, {id} \
             LIMIT $2"
        )
    }
}

#[async_trait]
impl VectorStore for PgVectorStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn nearest(&self, query_vector: &[f32], k: usize) -> DomainResult<Vec<ScoredDocument>> {
        validate_top_k(k)?;
        check_dimension(query_vector, self.dimension)?;

        let sql = self.nearest_sql();
        let literal = to_pgvector_literal(query_vector);
        let limit = i64::try_from(k).unwrap_or(i64::MAX);

        let rows = with_timeout(self.query_timeout, "nearest", async {
            let mut conn = self.pool.acquire().await?;
            let rows = sqlx::query(&sql)
                .bind(&literal)
                .bind(limit)
                .fetch_all(&mut *conn)
                .await?;
            Ok::<_, DomainError>(rows)
        })
        .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let content: String = row.try_get(0)?;
            let similarity: f64 = row.try_get(1)?;
            #[allow(clippy::cast_possible_truncation)]
            let similarity = if similarity.is_finite() {
                similarity as f32
            } else {
                0.0
            };
            results.push(ScoredDocument::new(content, similarity));
        }

        debug!(returned = results.len(), k, "pgvector query finished");
        Ok(results)
    }

    async fn insert(&self, document: &NewDocument) -> DomainResult<i64> {
        check_storable(&document.embedding, self.dimension)?;

        let SqlIdentifiers {
            table,
            content,
            embedding,
            id,
        } = &self.ids;
        let sql = format!(
            "INSERT INTO {table} ({content}, {embedding}) VALUES ($1, $2::vector) RETURNING {id}"
        );
        let literal = to_pgvector_literal(&document.embedding);

        with_timeout(self.query_timeout, "insert", async {
            let mut conn = self.pool.acquire().await?;
            let new_id: i64 = sqlx::query_scalar(&sql)
                .bind(&document.content)
                .bind(&literal)
                .fetch_one(&mut *conn)
                .await?;
            Ok::<_, DomainError>(new_id)
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
        let create_table = format!(
            r"
            CREATE TABLE IF NOT EXISTS {table} (
                {id} BIGSERIAL PRIMARY KEY,
                {content} TEXT NOT NULL,
                {embedding} vector({dimension}) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            ",
            dimension = self.dimension
        );

        let mut conn = self.pool.acquire().await?;
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&mut *conn)
            .await?;
        sqlx::query(&create_table).execute(&mut *conn).await?;

        info!(table = %table, dimension = self.dimension, "pgvector schema ready");
        Ok(())
    }
}
