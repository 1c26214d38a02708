//! A stored vector record

use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// An identifier paired with its vector.
///
/// Entries are never mutated in place: a collection replaces the whole vector on
/// update, and every entry handed out by a collection is an owned copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorEntry {
    id: String,
    vector: Vector,
}

impl VectorEntry {
    pub fn new(id: impl Into<String>, vector: impl Into<Vector>) -> Self {
        Self {
            id: id.into(),
            vector: vector.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn vector(&self) -> &Vector {
        &self.vector
    }

    pub fn dimension(&self) -> usize {
        self.vector.dimension()
    }

    pub fn into_parts(self) -> (String, Vector) {
        (self.id, self.vector)
    }

    pub(crate) fn replace_vector(&mut self, vector: Vector) {
        self.vector = vector;
    }
}
