//! Value export of a collection: bincode for exact binary copies, JSON for interchange.
//!
//! Both codecs round-trip every `f64` bit-for-bit, and entries are written in
//! insertion order so a restored collection breaks score ties the same way.

use crate::collection::Collection;
use crate::config::CollectionConfig;
use crate::entry::VectorEntry;
use crate::error::{Result, VectorDbError};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Serializable representation of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    pub name: String,
    #[serde(default)]
    pub config: CollectionConfig,
    /// Entries in insertion order
    pub entries: Vec<VectorEntry>,
}

impl Collection {
    /// Copy the collection's current state out as a snapshot.
    pub fn snapshot(&self) -> CollectionSnapshot {
        CollectionSnapshot {
            name: self.name().to_string(),
            config: *self.config(),
            entries: self.entries(),
        }
    }

    /// Rebuild a collection from a snapshot, re-validating every entry.
    pub fn from_snapshot(snapshot: CollectionSnapshot) -> Result<Self> {
        let mut collection = Collection::with_config(snapshot.name, snapshot.config);
        for entry in snapshot.entries {
            let (id, vector) = entry.into_parts();
            collection.add_vector(id, vector)?;
        }
        Ok(collection)
    }
}

impl CollectionSnapshot {
    /// Encode to bincode bytes.
    pub fn to_bincode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| VectorDbError::SerializationError(e.to_string()))
    }

    /// Decode from bincode bytes.
    pub fn from_bincode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| VectorDbError::SerializationError(e.to_string()))
    }

    /// Encode to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| VectorDbError::SerializationError(e.to_string()))
    }

    /// Decode from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| VectorDbError::SerializationError(e.to_string()))
    }

    /// Read JSON from any reader.
    pub fn read_json<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| VectorDbError::SerializationError(e.to_string()))
    }

    /// Write pretty-printed JSON to any writer.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| VectorDbError::SerializationError(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }
}
