//! the feature schema and the concrete feature vectors it describes.
//!
//! A schema fixes, once and for all, how many features a dataset row has
//! and what kind each one is. Predicates are only meaningful relative
//! to a schema: a predicate names a feature index and a schema says
//! whether that index is boolean or numeric.

use crate::error::DtlError;
use serde::{Deserialize, Serialize};

/// The kind of a single feature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// A `{0.0, 1.0}`-valued feature.
    Boolean,
    /// A real-valued feature with a fixed, pre-sorted list of candidate
    /// split cut points. `bestSplit` only ever considers thresholds drawn
    /// from this list, never arbitrary values in the column's range.
    Numeric { cut_points: Vec<f64> },
}

/// An ordered list of feature kinds, shared by every row in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    kinds: Vec<FeatureKind>,
    num_classes: usize,
}

impl FeatureSchema {
    pub fn new(kinds: Vec<FeatureKind>, num_classes: usize) -> Self {
        Self { kinds, num_classes }
    }

    pub fn num_features(&self) -> usize {
        self.kinds.len()
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn kind(&self, feature_index: usize) -> &FeatureKind {
        &self.kinds[feature_index]
    }

    pub fn kinds(&self) -> &[FeatureKind] {
        &self.kinds
    }

    /// Validates a row against this schema: right length, boolean columns
    /// hold only 0.0/1.0.
    pub fn validate_row(&self, row: &FeatureVector) -> Result<(), DtlError> {
        if row.values.len() != self.kinds.len() {
            return Err(DtlError::SchemaMismatch(format!(
                "row has {} features, schema expects {}",
                row.values.len(),
                self.kinds.len()
            )));
        }
        for (i, kind) in self.kinds.iter().enumerate() {
            if let FeatureKind::Boolean = kind {
                let v = row.values[i];
                if v != 0.0 && v != 1.0 {
                    return Err(DtlError::SchemaMismatch(format!(
                        "feature {i} is boolean but row holds {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A single row's feature values, all stored as `f64` regardless of
/// `FeatureKind` (boolean features are restricted to `{0.0, 1.0}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f64>,
    pub class: usize,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>, class: usize) -> Self {
        Self { values, class }
    }

    pub fn get(&self, feature_index: usize) -> f64 {
        self.values[feature_index]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(
            vec![FeatureKind::Boolean, FeatureKind::Numeric { cut_points: vec![1.0, 2.0] }],
            2,
        )
    }

    #[test]
    fn validate_row_rejects_wrong_length() {
        let s = schema();
        let row = FeatureVector::new(vec![1.0], 0);
        assert!(s.validate_row(&row).is_err());
    }

    #[test]
    fn validate_row_rejects_non_binary_boolean_feature() {
        let s = schema();
        let row = FeatureVector::new(vec![0.5, 1.5], 0);
        assert!(s.validate_row(&row).is_err());
    }

    #[test]
    fn validate_row_accepts_well_formed_row() {
        let s = schema();
        let row = FeatureVector::new(vec![1.0, 1.5], 1);
        assert!(s.validate_row(&row).is_ok());
    }
}
