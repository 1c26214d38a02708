//! Vector type and operations

use crate::error::{Result, VectorDbError};
use crate::summation::stable_norm;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A vector in n-dimensional space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Create a new vector from a Vec<f64>
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Get the dimension of the vector
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Get the underlying data as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume the vector and return its coordinates
    pub fn into_inner(self) -> Vec<f64> {
        self.data
    }

    /// Compute the L2 norm (magnitude) of the vector, safe from overflow and underflow
    pub fn norm(&self) -> f64 {
        stable_norm(&self.data)
    }

    /// Reject NaN and infinite coordinates
    pub fn ensure_finite(&self) -> Result<()> {
        match self.data.iter().position(|x| !x.is_finite()) {
            Some(i) => Err(VectorDbError::InvalidVector {
                reason: format!("non-finite value {} at index {}", self.data[i], i),
            }),
            None => Ok(()),
        }
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Vector::new(data)
    }
}

impl From<&[f64]> for Vector {
    fn from(data: &[f64]) -> Self {
        Vector::new(data.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Vector {
    fn from(data: [f64; N]) -> Self {
        Vector::new(data.to_vec())
    }
}

impl AsRef<[f64]> for Vector {
    fn as_ref(&self) -> &[f64] {
        &self.data
    }
}

/// Parse a vector from a comma-separated string
impl FromStr for Vector {
    type Err = VectorDbError;

    fn from_str(s: &str) -> Result<Self> {
        let data: Result<Vec<f64>> = s
            .split(',')
            .map(|x| {
                x.trim()
                    .parse::<f64>()
                    .map_err(|_| VectorDbError::InvalidVector {
                        reason: format!("Invalid float: {}", x),
                    })
            })
            .collect();
        let vector = Vector::new(data?);
        vector.ensure_finite()?;
        Ok(vector)
    }
}
