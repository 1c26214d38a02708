//! Similarity metrics for ranking vectors
//!
//! The query engine only ever sees [`SimilarityMetric`]; new metrics are added by
//! implementing the trait. [`DistanceMetric`] is a convenience selector for hosts
//! that pick one of the built-in metrics by name.

use crate::error::{Result, VectorDbError};
use crate::summation::{overflow_safe_dot, pow2_scale, stable_distance, CompensatedSum};
use serde::{Deserialize, Serialize};

/// A scoring function between two equal-length vectors, tagged with its ranking direction.
pub trait SimilarityMetric: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Score `a` against `b`.
    ///
    /// Fails with `DimensionMismatch` before any accumulation if the lengths differ.
    fn score(&self, a: &[f64], b: &[f64]) -> Result<f64>;

    /// `true` for similarities (rank descending), `false` for distances (rank ascending).
    fn higher_is_better(&self) -> bool;

    /// Check that `v` can take part in a score at all.
    ///
    /// Queries run this once against the query vector and fail the whole call on error.
    fn validate(&self, _v: &[f64]) -> Result<()> {
        Ok(())
    }
}

fn check_dimensions(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(VectorDbError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// Inner product. Higher is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DotProductSimilarity;

impl SimilarityMetric for DotProductSimilarity {
    fn name(&self) -> &'static str {
        "dot_product"
    }

    fn score(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        check_dimensions(a, b)?;
        Ok(overflow_safe_dot(a, b))
    }

    fn higher_is_better(&self) -> bool {
        true
    }
}

/// Cosine of the angle between two vectors. Higher is better.
///
/// Undefined when either vector is exactly zero. Both vectors are rescaled by a
/// power of two before accumulation, so tiny and huge magnitudes score the same
/// as their unit-scale counterparts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CosineSimilarity;

impl CosineSimilarity {
    fn scale(&self, v: &[f64]) -> Result<f64> {
        pow2_scale(v).ok_or_else(|| VectorDbError::UndefinedMetric {
            metric: self.name(),
            reason: "zero vector has no direction".to_string(),
        })
    }
}

impl SimilarityMetric for CosineSimilarity {
    fn name(&self) -> &'static str {
        "cosine"
    }

    fn score(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        check_dimensions(a, b)?;
        let scale_a = self.scale(a)?;
        let scale_b = self.scale(b)?;

        let mut dot = CompensatedSum::new();
        let mut norm_a = CompensatedSum::new();
        let mut norm_b = CompensatedSum::new();
        for (x, y) in a.iter().zip(b) {
            let (x, y) = (x / scale_a, y / scale_b);
            dot.add_product(x, y);
            norm_a.add_product(x, x);
            norm_b.add_product(y, y);
        }
        // Each scaled norm is at least 1
        let similarity = dot.value() / (norm_a.value().sqrt() * norm_b.value().sqrt());

        // Clamp to [-1, 1] to absorb the last bit of rounding
        Ok(similarity.clamp(-1.0, 1.0))
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn validate(&self, v: &[f64]) -> Result<()> {
        self.scale(v).map(|_| ())
    }
}

/// Euclidean (L2) distance. Lower is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EuclideanDistance;

impl SimilarityMetric for EuclideanDistance {
    fn name(&self) -> &'static str {
        "euclidean"
    }

    fn score(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        check_dimensions(a, b)?;
        Ok(stable_distance(a, b))
    }

    fn higher_is_better(&self) -> bool {
        false
    }
}

/// Selector for the built-in metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean (L2) distance
    Euclidean,
    /// Cosine similarity
    Cosine,
    /// Dot product
    DotProduct,
}

impl DistanceMetric {
    /// Resolve to the metric implementation.
    pub fn metric(&self) -> &'static dyn SimilarityMetric {
        match self {
            DistanceMetric::Euclidean => &EuclideanDistance,
            DistanceMetric::Cosine => &CosineSimilarity,
            DistanceMetric::DotProduct => &DotProductSimilarity,
        }
    }
}
