//! Bounded top-k selection with a deterministic tie-break.
//!
//! Candidates are ordered by score in the metric's ranking direction and then by
//! insertion sequence, so equal scores always resolve to the earliest inserted entry.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A scored item waiting to be ranked.
#[derive(Debug, Clone)]
pub struct Candidate<T> {
    pub score: f64,
    pub seq: u64,
    pub item: T,
    higher_is_better: bool,
}

impl<T> Candidate<T> {
    pub fn new(score: f64, seq: u64, item: T, higher_is_better: bool) -> Self {
        Self {
            score,
            seq,
            item,
            higher_is_better,
        }
    }
}

impl<T> PartialEq for Candidate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Candidate<T> {}

impl<T> PartialOrd for Candidate<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// `Less` means "ranks first". The max-heap therefore keeps the worst candidate on top.
impl<T> Ord for Candidate<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_score = if self.higher_is_better {
            other.score.partial_cmp(&self.score)
        } else {
            self.score.partial_cmp(&other.score)
        };
        by_score
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Keeps the `k` best candidates seen so far.
#[derive(Debug)]
pub struct TopK<T> {
    k: usize,
    heap: BinaryHeap<Candidate<T>>,
}

impl<T> TopK<T> {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.saturating_add(1).min(1024)),
        }
    }

    /// Offer a candidate, evicting the current worst once more than `k` are held.
    pub fn push(&mut self, candidate: Candidate<T>) {
        if self.k == 0 {
            return;
        }
        if self.heap.len() < self.k {
            self.heap.push(candidate);
        } else if let Some(worst) = self.heap.peek() {
            if candidate < *worst {
                self.heap.pop();
                self.heap.push(candidate);
            }
        }
    }

    /// Best candidate first.
    pub fn into_sorted_vec(self) -> Vec<Candidate<T>> {
        self.heap.into_sorted_vec()
    }
}

impl<T> Extend<Candidate<T>> for TopK<T> {
    fn extend<I: IntoIterator<Item = Candidate<T>>>(&mut self, iter: I) {
        for candidate in iter {
            self.push(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(scores: &[f64], higher_is_better: bool, k: usize) -> Vec<u64> {
        let mut top = TopK::new(k);
        top.extend(
            scores
                .iter()
                .enumerate()
                .map(|(i, s)| Candidate::new(*s, i as u64, (), higher_is_better)),
        );
        top.into_sorted_vec().into_iter().map(|c| c.seq).collect()
    }

    #[test]
    fn test_descending_for_similarity() {
        assert_eq!(ranked(&[0.1, 0.9, 0.5], true, 3), vec![1, 2, 0]);
    }

    #[test]
    fn test_ascending_for_distance() {
        assert_eq!(ranked(&[0.1, 0.9, 0.5], false, 3), vec![0, 2, 1]);
    }

    #[test]
    fn test_bounded_to_k() {
        assert_eq!(ranked(&[3.0, 1.0, 4.0, 1.5, 9.0, 2.6], true, 2), vec![4, 2]);
        assert_eq!(ranked(&[3.0, 1.0, 4.0, 1.5, 9.0, 2.6], false, 2), vec![1, 3]);
    }

    #[test]
    fn test_ties_break_by_sequence() {
        assert_eq!(ranked(&[1.0, 2.0, 1.0, 2.0, 1.0], true, 5), vec![1, 3, 0, 2, 4]);
        assert_eq!(ranked(&[1.0, 2.0, 1.0, 2.0, 1.0], false, 2), vec![0, 2]);
    }

    #[test]
    fn test_late_tie_does_not_evict_earlier() {
        // The heap is full with seq 0 and 1; seq 2 ties with seq 1 and must lose.
        assert_eq!(ranked(&[5.0, 4.0, 4.0], true, 2), vec![0, 1]);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        assert_eq!(ranked(&[0.0, -0.0], true, 2), vec![0, 1]);
        assert_eq!(ranked(&[-0.0, 0.0], true, 1), vec![0]);
    }

    #[test]
    fn test_zero_k() {
        assert!(ranked(&[1.0, 2.0], true, 0).is_empty());
    }
}
