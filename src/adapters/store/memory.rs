//! In-memory vector store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::check_storable;
use crate::domain::errors::DomainResult;
use crate::domain::models::{cosine_similarity, rank_candidates, NewDocument, ScoredDocument};
use crate::domain::ports::{check_dimension, validate_top_k, VectorStore};

/// Process-local vector store with exact cosine search.
pub struct InMemoryVectorStore {
    dimension: usize,
    documents: RwLock<Vec<NewDocument>>,
}

impl InMemoryVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            documents: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn nearest(&self, query_vector: &[f32], k: usize) -> DomainResult<Vec<ScoredDocument>> {
        validate_top_k(k)?;
        check_dimension(query_vector, self.dimension)?;

        let documents = self.documents.read().await;
        let candidates = documents
            .iter()
            .map(|doc| {
                ScoredDocument::new(
                    doc.content.clone(),
                    cosine_similarity(query_vector, &doc.embedding).unwrap_or(0.0),
                )
            })
            .collect();

        Ok(rank_candidates(candidates, k))
    }

    async fn insert(&self, document: &NewDocument) -> DomainResult<i64> {
        check_storable(&document.embedding, self.dimension)?;
        let mut documents = self.documents.write().await;
        documents.push(document.clone());
        Ok(i64::try_from(documents.len()).unwrap_or(i64::MAX))
    }

    async fn count(&self) -> DomainResult<usize> {
        Ok(self.documents.read().await.len())
    }

    async fn ensure_schema(&self) -> DomainResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;

    async fn seeded() -> InMemoryVectorStore {
        let store = InMemoryVectorStore::new(2);
        store.insert(&NewDocument::new("east", vec![1.0, 0.0])).await.unwrap();
        store.insert(&NewDocument::new("north", vec![0.0, 1.0])).await.unwrap();
        store.insert(&NewDocument::new("northeast", vec![1.0, 1.0])).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_nearest_orders_by_similarity() {
        let store = seeded().await;
        let results = store.nearest(&[1.0, 0.1], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "east");
        assert_eq!(results[1].content, "northeast");
        assert!(results[0].similarity >= results[1].similarity);
    }

    #[tokio::test]
    async fn test_k_larger_than_store() {
        let store = seeded().await;
        assert_eq!(store.nearest(&[1.0, 0.0], 10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let store = InMemoryVectorStore::new(2);
        store.insert(&NewDocument::new("first", vec![1.0, 0.0])).await.unwrap();
        store.insert(&NewDocument::new("second", vec![2.0, 0.0])).await.unwrap();
        let results = store.nearest(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results[0].content, "first");
        assert_eq!(results[1].content, "second");
    }

    #[tokio::test]
    async fn test_rejects_bad_input() {
        let store = seeded().await;
        assert!(matches!(
            store.nearest(&[1.0, 0.0], 0).await,
            Err(DomainError::InvalidTopK(0))
        ));
        assert!(matches!(
            store.nearest(&[1.0, 0.0, 0.0], 1).await,
            Err(DomainError::DimensionMismatch { expected: 2, actual: 3 })
        ));
        assert!(store.insert(&NewDocument::new("zero", vec![0.0, 0.0])).await.is_err());
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_empty_store_returns_nothing() {
        let store = InMemoryVectorStore::new(2);
        assert!(store.nearest(&[1.0, 0.0], 3).await.unwrap().is_empty());
    }
}
