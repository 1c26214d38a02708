//! Top-level routing from collection names to collections

use crate::collection::Collection;
use crate::config::CollectionConfig;
use crate::error::{Result, VectorDbError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Shared handle to a collection.
///
/// Queries take the read lock, mutations the write lock. Callers should never
/// hold two collections' locks at once.
pub type CollectionHandle = Arc<RwLock<Collection>>;

/// Owns every collection, keyed by name.
///
/// The host constructs a `Database` explicitly and passes it where needed.
#[derive(Debug, Default)]
pub struct Database {
    collections: HashMap<String, CollectionHandle>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unconstrained collection.
    pub fn create_collection(&mut self, name: &str) -> Result<CollectionHandle> {
        self.create_collection_with_config(name, CollectionConfig::default())
    }

    /// Create a collection with the given configuration.
    ///
    /// Fails with `CollectionAlreadyExists` if the name is taken; the existing
    /// collection is left untouched.
    pub fn create_collection_with_config(
        &mut self,
        name: &str,
        config: CollectionConfig,
    ) -> Result<CollectionHandle> {
        if self.collections.contains_key(name) {
            return Err(VectorDbError::CollectionAlreadyExists {
                name: name.to_string(),
            });
        }
        let handle = Arc::new(RwLock::new(Collection::with_config(name, config)));
        self.collections.insert(name.to_string(), Arc::clone(&handle));
        debug!(collection = name, dimension = ?config.dimension, "created collection");
        Ok(handle)
    }

    /// Register an already-built collection under its own name.
    pub fn insert_collection(&mut self, collection: Collection) -> Result<CollectionHandle> {
        let name = collection.name().to_string();
        if self.collections.contains_key(&name) {
            return Err(VectorDbError::CollectionAlreadyExists { name });
        }
        let handle = Arc::new(RwLock::new(collection));
        self.collections.insert(name.clone(), Arc::clone(&handle));
        debug!(collection = %name, "registered collection");
        Ok(handle)
    }

    /// Look up a collection by name.
    pub fn get_collection(&self, name: &str) -> Result<CollectionHandle> {
        self.collections
            .get(name)
            .cloned()
            .ok_or_else(|| VectorDbError::CollectionNotFound {
                name: name.to_string(),
            })
    }

    /// Drop a collection. Outstanding handles keep their copy alive but it is
    /// no longer reachable through the database.
    pub fn delete_collection(&mut self, name: &str) -> Result<()> {
        self.collections
            .remove(name)
            .ok_or_else(|| VectorDbError::CollectionNotFound {
                name: name.to_string(),
            })?;
        debug!(collection = name, "deleted collection");
        Ok(())
    }

    pub fn contains_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Collection names, sorted.
    pub fn list_collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CosineSimilarity;

    #[test]
    fn test_create_and_get() {
        let mut db = Database::new();
        db.create_collection("docs").unwrap();
        let handle = db.get_collection("docs").unwrap();
        assert_eq!(handle.read().name(), "docs");
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_duplicate_collection_rejected() {
        let mut db = Database::new();
        let first = db.create_collection("docs").unwrap();
        first.write().add_vector("a", [1.0]).unwrap();

        assert!(matches!(
            db.create_collection("docs"),
            Err(VectorDbError::CollectionAlreadyExists { .. })
        ));
        assert_eq!(db.get_collection("docs").unwrap().read().len(), 1);
    }

    #[test]
    fn test_identity_stable_across_lookups() {
        let mut db = Database::new();
        db.create_collection("docs").unwrap();
        let a = db.get_collection("docs").unwrap();
        let b = db.get_collection("docs").unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        a.write().add_vector("x", [1.0, 0.0]).unwrap();
        assert!(b.read().contains("x"));
    }

    #[test]
    fn test_missing_collection() {
        let mut db = Database::new();
        assert!(matches!(
            db.get_collection("nope"),
            Err(VectorDbError::CollectionNotFound { .. })
        ));
        assert!(db.delete_collection("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_collection() {
        let mut db = Database::new();
        db.create_collection("docs").unwrap();
        db.delete_collection("docs").unwrap();
        assert!(!db.contains_collection("docs"));
        assert!(db.is_empty());
        assert!(db.delete_collection("docs").is_err());
    }

    #[test]
    fn test_collections_are_isolated() {
        let mut db = Database::new();
        let a = db.create_collection("a").unwrap();
        let b = db.create_collection("b").unwrap();
        a.write().add_vector("v", [1.0, 0.0, 0.0]).unwrap();
        b.write().add_vector("v", [0.0, 1.0]).unwrap();

        let hits = a.read().query([1.0, 0.0, 0.0], &CosineSimilarity, 1).unwrap();
        assert_eq!(hits[0].vector().as_slice(), &[1.0, 0.0, 0.0]);
        assert_eq!(b.read().dimension(), Some(2));
    }

    #[test]
    fn test_list_collections_sorted() {
        let mut db = Database::new();
        for name in ["zeta", "alpha", "mid"] {
            db.create_collection(name).unwrap();
        }
        assert_eq!(db.list_collections(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_insert_prebuilt_collection() {
        let mut db = Database::new();
        let mut c = Collection::new("prebuilt");
        c.add_vector("a", [1.0]).unwrap();
        db.insert_collection(c).unwrap();
        assert_eq!(db.get_collection("prebuilt").unwrap().read().len(), 1);
        assert!(db.insert_collection(Collection::new("prebuilt")).is_err());
    }
}
