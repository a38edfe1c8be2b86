//! Vector scoring functions for clustering.
//!
//! Pure-Rust implementations of:
//! - Cosine similarity (higher = closer)
//! - Euclidean distance (lower = closer)

use mazewalk_core::{Distance, ModelError, Proximity};

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if either vector is zero-length or empty.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

fn same_length(a: &[f32], b: &[f32]) -> Result<(), ModelError> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(ModelError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CosineDistance;

impl Distance for CosineDistance {
    fn name(&self) -> &str {
        "cosine"
    }

    fn distance(&self, a: &[f32], b: &[f32]) -> Result<f32, ModelError> {
        same_length(a, b)?;
        Ok(cosine_similarity(a, b))
    }

    fn proximity(&self) -> Proximity {
        Proximity::HigherIsCloser
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl Distance for EuclideanDistance {
    fn name(&self) -> &str {
        "euclidean"
    }

    fn distance(&self, a: &[f32], b: &[f32]) -> Result<f32, ModelError> {
        same_length(a, b)?;
        let sum: f64 = a
            .iter()
            .zip(b)
            .map(|(x, y)| {
                let d = (*x - *y) as f64;
                d * d
            })
            .sum();
        Ok(sum.sqrt() as f32)
    }

    fn proximity(&self) -> Proximity {
        Proximity::LowerIsCloser
    }
}
