//! Embedding vector helpers
//!
//! Framework-agnostic vector math shared by the embedding providers and the
//! vector store backends.

use crate::domain::errors::{DomainError, DomainResult};

/// Dimension of all-MiniLM-L6-v2, the default embedding model.
pub const MINILM_DIMENSION: usize = 384;

/// Cosine similarity between two vectors of equal length.
///
/// Returns `None` when the lengths differ or either vector has zero magnitude,
/// since the angle is undefined in both cases.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    // Accumulate in f64; 384+ terms in f32 drift noticeably.
    let (dot, mag_a, mag_b) = a.iter().zip(b).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, ma, mb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, ma + x * x, mb + y * y)
        },
    );

    if mag_a == 0.0 || mag_b == 0.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    let similarity = (dot / (mag_a.sqrt() * mag_b.sqrt())) as f32;
    Some(similarity.clamp(-1.0, 1.0))
}

/// Scale a vector to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(vector: &mut [f32]) {
    let magnitude = vector
        .iter()
        .map(|x| f64::from(*x) * f64::from(*x))
        .sum::<f64>()
        .sqrt();

    if magnitude > 1e-12 {
        for val in vector.iter_mut() {
            #[allow(clippy::cast_possible_truncation)]
            {
                *val = (f64::from(*val) / magnitude) as f32;
            }
        }
    }
}

/// Check a vector produced by an embedding provider.
///
/// Rejects wrong dimensionality, non-finite components and the zero vector;
/// a provider must never hand back a zero vector in place of a failure.
pub fn validate_embedding(vector: &[f32], expected_dimension: usize) -> DomainResult<()> {
    if vector.len() != expected_dimension {
        return Err(DomainError::DimensionMismatch {
            expected: expected_dimension,
            actual: vector.len(),
        });
    }

    if vector.iter().any(|v| !v.is_finite()) {
        return Err(DomainError::EmbeddingUnavailable(
            "embedding contains non-finite values".to_string(),
        ));
    }

    if vector.iter().all(|v| *v == 0.0) {
        return Err(DomainError::EmbeddingUnavailable(
            "embedding is a zero vector".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let v = [0.3, -0.2, 0.9];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal_and_opposite() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_undefined() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), None);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), None);
        assert_eq!(cosine_similarity(&[], &[]), None);
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }

    #[test]
    fn test_validate_embedding() {
        assert!(validate_embedding(&[0.1, 0.2], 2).is_ok());
        assert!(matches!(
            validate_embedding(&[0.1, 0.2], 3),
            Err(DomainError::DimensionMismatch { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            validate_embedding(&[0.0, 0.0], 2),
            Err(DomainError::EmbeddingUnavailable(_))
        ));
        assert!(matches!(
            validate_embedding(&[f32::NAN, 1.0], 2),
            Err(DomainError::EmbeddingUnavailable(_))
        ));
    }
}
