//! # OxVec
//!
//! An in-memory vector database with exact nearest-neighbor search.
//!
//! This library provides:
//! - Named collections of fixed-dimensionality vectors with CRUD operations
//! - Pluggable similarity metrics (Euclidean, Cosine, Dot Product) accumulated
//!   with compensated summation
//! - Deterministic top-k ranking, ties broken by insertion order
//! - Snapshot export in JSON and bincode
//!
//! ## Example
//!
//! ```rust
//! use oxvec::{CosineSimilarity, Database};
//!
//! let mut db = Database::new();
//! let docs = db.create_collection("docs").unwrap();
//!
//! {
//!     let mut docs = docs.write();
//!     docs.add_vector("vec1", [1.0, 0.0, 0.0]).unwrap();
//!     docs.add_vector("vec3", [0.0, 0.0, 1.0]).unwrap();
//!     docs.add_vector("vec4", [1.0, 1.0, 0.0]).unwrap();
//! }
//!
//! let results = docs.read().query([1.0, 0.0, 0.0], &CosineSimilarity, 3).unwrap();
//! let ids: Vec<&str> = results.iter().map(|e| e.id()).collect();
//! assert_eq!(ids, ["vec1", "vec4", "vec3"]);
//! ```

pub mod collection;
pub mod config;
pub mod database;
pub mod distance;
pub mod entry;
pub mod error;
pub mod snapshot;
pub mod summation;
pub mod topk;
pub mod vector;

pub use collection::{Collection, SearchResult};
pub use config::CollectionConfig;
pub use database::{CollectionHandle, Database};
pub use distance::{
    CosineSimilarity, DistanceMetric, DotProductSimilarity, EuclideanDistance, SimilarityMetric,
};
pub use entry::VectorEntry;
pub use error::{Result, VectorDbError};
pub use snapshot::CollectionSnapshot;
pub use vector::Vector;
