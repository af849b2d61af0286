//! symbolic predicates over a single feature. A predicate is of the
//! form "feature `i` <= threshold" (numeric) or "feature `i` is true"
//! (boolean); both are represented uniformly as a feature index plus a
//! threshold slot so the box domain can carry them in one type, with
//! the schema deciding which reading applies.

use crate::schema::{FeatureKind, FeatureSchema, FeatureVector};
use serde::{Deserialize, Serialize};

/// `feature[feature_index] <= threshold` for a numeric feature,
/// `feature[feature_index] = true` for a boolean one. The threshold
/// slot is only meaningful for numeric features; boolean candidates
/// carry `0.0` as a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolicPredicate {
    pub feature_index: usize,
    pub threshold: f64,
}

impl SymbolicPredicate {
    pub fn new(feature_index: usize, threshold: f64) -> Self {
        Self { feature_index, threshold }
    }

    /// `true` iff `x` satisfies this predicate under `schema`'s reading
    /// of the feature: at most the threshold for a numeric feature, set
    /// for a boolean one (boolean columns hold exactly `0.0` or `1.0`,
    /// enforced by [`FeatureSchema::validate_row`]).
    pub fn models(&self, x: &FeatureVector, schema: &FeatureSchema) -> bool {
        match schema.kind(self.feature_index) {
            FeatureKind::Boolean => x.get(self.feature_index) == 1.0,
            FeatureKind::Numeric { .. } => x.get(self.feature_index) <= self.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_predicate_splits_at_threshold() {
        let schema = FeatureSchema::new(vec![FeatureKind::Numeric { cut_points: vec![2.0] }], 2);
        let p = SymbolicPredicate::new(0, 2.0);
        let low = FeatureVector::new(vec![1.5], 0);
        let high = FeatureVector::new(vec![2.5], 0);
        assert!(p.models(&low, &schema));
        assert!(!p.models(&high, &schema));
    }

    #[test]
    fn boolean_predicate_holds_when_the_feature_is_set() {
        let schema = FeatureSchema::new(vec![FeatureKind::Boolean], 2);
        let p = SymbolicPredicate::new(0, 0.0);
        let is_true = FeatureVector::new(vec![1.0], 0);
        let is_false = FeatureVector::new(vec![0.0], 0);
        assert!(p.models(&is_true, &schema));
        assert!(!p.models(&is_false, &schema));
    }

    #[test]
    fn boolean_threshold_slot_is_ignored() {
        let schema = FeatureSchema::new(vec![FeatureKind::Boolean], 2);
        let p = SymbolicPredicate::new(0, 0.0);
        let q = SymbolicPredicate::new(0, 1.0);
        let is_true = FeatureVector::new(vec![1.0], 0);
        assert_eq!(p.models(&is_true, &schema), q.models(&is_true, &schema));
    }
}
