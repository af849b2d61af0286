//! `DataReferences`, a sorted set of row indices into a shared
//! dataset. The evaluator never copies row data; every abstraction that
//! tracks "which rows survive" does so by index.

use std::sync::Arc;

use crate::schema::FeatureVector;

/// A sorted, deduplicated set of row indices, invariant `D subset of
/// {0, ..., N-1}` where `N` is the owning dataset's row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataReferences {
    indices: Vec<usize>,
}

impl DataReferences {
    /// All indices `0..n`.
    pub fn full(n: usize) -> Self {
        Self { indices: (0..n).collect() }
    }

    pub fn empty() -> Self {
        Self { indices: Vec::new() }
    }

    /// Builds from an arbitrary index iterator, sorting and deduplicating.
    pub fn from_indices(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Restricts `self` to the indices for which `keep` returns `true`,
    /// looking each row up in `rows`.
    pub fn filter(&self, rows: &Arc<[FeatureVector]>, keep: impl Fn(&FeatureVector) -> bool) -> Self {
        Self {
            indices: self.indices.iter().copied().filter(|&i| keep(&rows[i])).collect(),
        }
    }

    /// Union of two reference sets, sorted and deduplicated.
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = self.indices.clone();
        merged.extend(other.indices.iter().copied());
        Self::from_indices(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Arc<[FeatureVector]> {
        Arc::from(vec![
            FeatureVector::new(vec![1.0], 0),
            FeatureVector::new(vec![2.0], 1),
            FeatureVector::new(vec![3.0], 0),
        ])
    }

    #[test]
    fn full_covers_every_index() {
        let refs = DataReferences::full(3);
        assert_eq!(refs.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn from_indices_sorts_and_dedups() {
        let refs = DataReferences::from_indices(vec![2, 0, 2, 1]);
        assert_eq!(refs.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn filter_keeps_only_matching_rows() {
        let refs = DataReferences::full(3);
        let filtered = refs.filter(&rows(), |r| r.get(0) > 1.5);
        assert_eq!(filtered.as_slice(), &[1, 2]);
    }

    #[test]
    fn union_merges_and_dedups() {
        let a = DataReferences::from_indices(vec![0, 1]);
        let b = DataReferences::from_indices(vec![1, 2]);
        assert_eq!(a.union(&b).as_slice(), &[0, 1, 2]);
    }
}
