//! Error types for the vector database

use thiserror::Error;

/// Result type alias for OxVec operations
pub type Result<T> = std::result::Result<T, VectorDbError>;

/// Error types that can occur in OxVec operations
#[derive(Error, Debug)]
pub enum VectorDbError {
    #[error("Duplicate vector id: {id}")]
    DuplicateId { id: String },

    #[error("Vector not found: {id}")]
    VectorNotFound { id: String },

    #[error("Collection not found: {name}")]
    CollectionNotFound { name: String },

    #[error("Collection already exists: {name}")]
    CollectionAlreadyExists { name: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Metric {metric} is undefined: {reason}")]
    UndefinedMetric { metric: &'static str, reason: String },

    #[error("Invalid vector: {reason}")]
    InvalidVector { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl VectorDbError {
    /// True for lookups against an absent vector id or collection name.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            VectorDbError::VectorNotFound { .. } | VectorDbError::CollectionNotFound { .. }
        )
    }
}
