//! Integration tests for the SQLite vector store backend.

mod common;

use std::path::Path;
use std::sync::Arc;

use common::axis;
use strand::adapters::completion::MockCompletionProvider;
use strand::adapters::embeddings::HashingEmbeddingProvider;
use strand::adapters::store::SqliteVectorStore;
use strand::domain::errors::DomainError;
use strand::domain::models::{NewDocument, StoreBackend, StoreConfig};
use strand::domain::ports::VectorStore;
use strand::services::{Agent, Ingestor, Retriever, SAMPLE_DOCUMENTS};

fn sqlite_config(dir: &Path) -> StoreConfig {
    StoreConfig {
        backend: StoreBackend::Sqlite,
        url: format!("sqlite://{}", dir.join("strand.db").display()),
        ..Default::default()
    }
}

async fn open(dir: &Path, dimension: usize) -> SqliteVectorStore {
    let store = SqliteVectorStore::connect(&sqlite_config(dir), dimension)
        .await
        .unwrap();
    store.ensure_schema().await.unwrap();
    store
}

#[tokio::test]
async fn test_documents_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open(dir.path(), 3).await;
        store
            .insert(&NewDocument::new("persisted", axis(3, 2)))
            .await
            .unwrap();
    }

    let reopened = open(dir.path(), 3).await;
    assert_eq!(reopened.count().await.unwrap(), 1);
    let results = reopened.nearest(&axis(3, 2), 5).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content, "persisted");
    assert!((results[0].similarity - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_equal_similarity_keeps_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path(), 2).await;
    for content in ["first", "second", "third"] {
        store
            .insert(&NewDocument::new(content, vec![1.0, 1.0]))
            .await
            .unwrap();
    }

    let contents: Vec<_> = store
        .nearest(&[1.0, 1.0], 3)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.content)
        .collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path(), 2).await;

    assert!(matches!(
        store.nearest(&[1.0, 0.0], 0).await,
        Err(DomainError::InvalidTopK(0))
    ));
    assert!(matches!(
        store.nearest(&[1.0, 0.0, 0.0], 1).await,
        Err(DomainError::DimensionMismatch { expected: 2, actual: 3 })
    ));
    assert!(matches!(
        store.insert(&NewDocument::new("zero", vec![0.0, 0.0])).await,
        Err(DomainError::ValidationFailed(_))
    ));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_table_returns_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path(), 2).await;
    assert!(store.nearest(&[1.0, 0.0], 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_table_is_store_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteVectorStore::connect(&sqlite_config(dir.path()), 2)
        .await
        .unwrap();
    assert!(matches!(
        store.nearest(&[1.0, 0.0], 1).await,
        Err(DomainError::StoreUnavailable(_))
    ));
}

#[tokio::test]
async fn test_seed_then_ask_offline() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(open(dir.path(), 256).await);
    let embedder = Arc::new(HashingEmbeddingProvider::new(256).unwrap());

    let report = Ingestor::new(embedder.clone(), store.clone())
        .unwrap()
        .ingest(SAMPLE_DOCUMENTS.iter().map(ToString::to_string).collect())
        .await;
    assert_eq!(report.inserted(), SAMPLE_DOCUMENTS.len());
    assert_eq!(report.failed, 0);
    assert_eq!(store.count().await.unwrap(), SAMPLE_DOCUMENTS.len());

    let retriever = Retriever::new(embedder, store).unwrap();
    let top = retriever.retrieve("Does this agent retrieve from Postgres?", 1).await;
    assert_eq!(top.len(), 1);
    assert!(top[0].contains("Postgres"), "got {top:?}");

    let completion = Arc::new(MockCompletionProvider::default());
    let agent = Agent::new(retriever, completion).with_top_k(2);
    let echoed = agent.run("Does this agent retrieve from Postgres?").await;
    assert!(echoed.starts_with("Based on the following context"));
    assert!(echoed.ends_with("Question: Does this agent retrieve from Postgres?\n\nAnswer:"));
}
