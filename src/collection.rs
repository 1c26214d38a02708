//! A named set of fixed-dimensionality vectors with exact similarity search

use crate::config::CollectionConfig;
use crate::distance::SimilarityMetric;
use crate::entry::VectorEntry;
use crate::error::{Result, VectorDbError};
use crate::topk::{Candidate, TopK};
use crate::vector::Vector;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Collections at least this large are scored on the rayon pool.
const PARALLEL_SCAN_THRESHOLD: usize = 4096;

/// A query hit: a copy of the matched entry and its score under the query metric.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub entry: VectorEntry,
    pub score: f64,
}

#[derive(Debug, Clone)]
struct StoredEntry {
    /// Insertion sequence, used to break score ties
    seq: u64,
    entry: VectorEntry,
}

/// Score one stored entry, or `None` if the metric is undefined for it.
fn score_entry<'a>(
    stored: &'a StoredEntry,
    query: &[f64],
    metric: &dyn SimilarityMetric,
) -> Result<Option<Candidate<&'a StoredEntry>>> {
    match metric.score(stored.entry.vector().as_slice(), query) {
        Ok(score) if score.is_nan() => {
            trace!(id = stored.entry.id(), metric = metric.name(), "excluded NaN score");
            Ok(None)
        }
        Ok(score) => Ok(Some(Candidate::new(
            score,
            stored.seq,
            stored,
            metric.higher_is_better(),
        ))),
        Err(VectorDbError::UndefinedMetric { reason, .. }) => {
            trace!(id = stored.entry.id(), metric = metric.name(), %reason, "excluded entry");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// In-memory vector collection.
#[derive(Debug)]
pub struct Collection {
    name: String,
    config: CollectionConfig,
    entries: HashMap<String, StoredEntry>,
    /// Enforced vector dimension
    dimension: Option<usize>,
    /// Next insertion sequence to assign
    next_seq: u64,
}

impl Collection {
    /// Create an empty, unconstrained collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, CollectionConfig::default())
    }

    /// Create an empty collection with the given configuration.
    pub fn with_config(name: impl Into<String>, config: CollectionConfig) -> Self {
        Self {
            name: name.into(),
            config,
            entries: HashMap::new(),
            dimension: config.dimension,
            next_seq: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Get the number of vectors in the collection
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the dimension of vectors in this collection (if established)
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        match self.dimension {
            Some(expected) if expected != actual => {
                Err(VectorDbError::DimensionMismatch { expected, actual })
            }
            _ => Ok(()),
        }
    }

    /// Insert a new vector.
    ///
    /// Fails with `DuplicateId` if `id` is already present and with
    /// `DimensionMismatch` if the length disagrees with the collection.
    pub fn add_vector(&mut self, id: impl Into<String>, vector: impl Into<Vector>) -> Result<()> {
        let id = id.into();
        let vector = vector.into();

        if self.entries.contains_key(&id) {
            return Err(VectorDbError::DuplicateId { id });
        }
        self.check_dimension(vector.dimension())?;
        vector.ensure_finite()?;

        if self.dimension.is_none() {
            self.dimension = Some(vector.dimension());
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        debug!(collection = %self.name, id = %id, seq, "added vector");
        self.entries.insert(
            id.clone(),
            StoredEntry {
                seq,
                entry: VectorEntry::new(id, vector),
            },
        );
        Ok(())
    }

    /// Get a copy of the entry stored under `id`.
    pub fn get_vector(&self, id: &str) -> Result<VectorEntry> {
        self.entries
            .get(id)
            .map(|stored| stored.entry.clone())
            .ok_or_else(|| VectorDbError::VectorNotFound { id: id.to_string() })
    }

    /// Replace the vector stored under `id`, keeping its identifier and insertion order.
    ///
    /// A failed update leaves the previous vector intact.
    pub fn update_vector(&mut self, id: &str, vector: impl Into<Vector>) -> Result<()> {
        let vector = vector.into();
        if !self.entries.contains_key(id) {
            return Err(VectorDbError::VectorNotFound { id: id.to_string() });
        }
        self.check_dimension(vector.dimension())?;
        vector.ensure_finite()?;

        if let Some(stored) = self.entries.get_mut(id) {
            stored.entry.replace_vector(vector);
        }
        debug!(collection = %self.name, id, "updated vector");
        Ok(())
    }

    /// Remove the entry stored under `id` and return it.
    ///
    /// Deleting an absent id fails; repeated deletes are not silently accepted.
    pub fn delete_vector(&mut self, id: &str) -> Result<VectorEntry> {
        let stored = self
            .entries
            .remove(id)
            .ok_or_else(|| VectorDbError::VectorNotFound { id: id.to_string() })?;

        if self.entries.is_empty() && self.config.dimension.is_none() {
            self.dimension = None;
        }
        debug!(collection = %self.name, id, "deleted vector");
        Ok(stored.entry)
    }

    fn sorted_entries(&self) -> Vec<&StoredEntry> {
        let mut stored: Vec<&StoredEntry> = self.entries.values().collect();
        stored.sort_by_key(|s| s.seq);
        stored
    }

    /// List all vector IDs in insertion order
    pub fn ids(&self) -> Vec<String> {
        self.sorted_entries()
            .into_iter()
            .map(|s| s.entry.id().to_string())
            .collect()
    }

    /// Copies of all entries in insertion order
    pub fn entries(&self) -> Vec<VectorEntry> {
        self.sorted_entries()
            .into_iter()
            .map(|s| s.entry.clone())
            .collect()
    }

    /// Return up to `k` entries ranked by `metric` against `query`.
    pub fn query(
        &self,
        query: impl AsRef<[f64]>,
        metric: &dyn SimilarityMetric,
        k: usize,
    ) -> Result<Vec<VectorEntry>> {
        Ok(self
            .query_with_scores(query, metric, k)?
            .into_iter()
            .map(|hit| hit.entry)
            .collect())
    }

    /// Like [`Collection::query`], keeping each hit's score.
    ///
    /// Entries whose score is undefined under `metric` (a stored zero vector under
    /// cosine, say) are left out of the ranking. If the query vector itself fails
    /// the metric's precondition the whole query fails. Equal scores rank in
    /// insertion order.
    pub fn query_with_scores(
        &self,
        query: impl AsRef<[f64]>,
        metric: &dyn SimilarityMetric,
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        let query = query.as_ref();
        if self.is_empty() {
            return Ok(vec![]);
        }

        self.check_dimension(query.len())?;
        Vector::from(query).ensure_finite()?;
        metric.validate(query)?;

        let candidates: Vec<Candidate<&StoredEntry>> =
            if self.entries.len() >= PARALLEL_SCAN_THRESHOLD {
                self.entries
                    .par_iter()
                    .map(|(_, stored)| score_entry(stored, query, metric))
                    .filter_map(Result::transpose)
                    .collect::<Result<Vec<_>>>()?
            } else {
                self.entries
                    .values()
                    .map(|stored| score_entry(stored, query, metric))
                    .filter_map(Result::transpose)
                    .collect::<Result<Vec<_>>>()?
            };

        let ranked = candidates.len();
        let mut top = TopK::new(k);
        top.extend(candidates);

        let results: Vec<SearchResult> = top
            .into_sorted_vec()
            .into_iter()
            .map(|c| SearchResult {
                entry: c.item.entry.clone(),
                score: c.score,
            })
            .collect();

        debug!(
            collection = %self.name,
            metric = metric.name(),
            k,
            scanned = self.entries.len(),
            excluded = self.entries.len() - ranked,
            returned = results.len(),
            "query complete"
        );
        Ok(results)
    }
}
