//! `Phi#`, the abstraction of "the predicate `bestSplit` would choose."
//! A finite, positionally-indexed collection of candidate predicates, with
//! a distinguished bottom member (`None`) standing for "no best split
//! exists in this instantiation" — e.g. every candidate could be trivial,
//! or the training set is too perturbed to know which one wins.
//! Concretization is any single member of the collection; the invariant is
//! that at least one slot is always occupied, since an empty collection
//! can only arise from an already-bottom box state.

use crate::predicate::SymbolicPredicate;
use crate::schema::{FeatureSchema, FeatureVector};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// `slots[k] == None` is the `⊥` member: "the concrete best split may be
/// undefined here." `slots[k] == Some(p)` is the candidate predicate `p`.
/// Slots are kept sorted by `(feature_index, threshold)` with `⊥` last,
/// so that structurally equal abstractions compare equal no matter what
/// order their members were discovered in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateAbstraction {
    slots: Vec<Option<SymbolicPredicate>>,
}

fn canonicalize(slots: &mut Vec<Option<SymbolicPredicate>>) {
    slots.sort_by_key(|slot| match slot {
        Some(p) => (0, p.feature_index, OrderedFloat(p.threshold)),
        None => (1, usize::MAX, OrderedFloat(f64::INFINITY)),
    });
    slots.dedup();
}

impl PredicateAbstraction {
    /// The empty collection: no candidate and no `⊥` either. Only ever
    /// produced by an already-bottom box state, since a live training set
    /// always has at least `{⊥}` to fall back on.
    pub fn bottom() -> Self {
        Self { slots: Vec::new() }
    }

    /// The singleton `{⊥}`: a best split may not exist (every candidate
    /// was trivial, or there were no candidates at all). This is also the
    /// state before any `bestSplit` has run.
    pub fn undefined() -> Self {
        Self { slots: vec![None] }
    }

    /// Builds `Phi#` from a set of candidate predicates, optionally
    /// including the `⊥` slot (present when the concrete best split might
    /// not exist at all; absent when every concretization definitely has
    /// a nontrivial best split among `candidates`).
    pub fn from_candidates(candidates: Vec<SymbolicPredicate>, include_undefined: bool) -> Self {
        let mut slots: Vec<Option<SymbolicPredicate>> = candidates.into_iter().map(Some).collect();
        if include_undefined {
            slots.push(None);
        }
        canonicalize(&mut slots);
        Self { slots }
    }

    pub fn is_bottom(&self) -> bool {
        self.slots.is_empty()
    }

    /// `true` iff some slot is the `⊥` member.
    pub fn contains_undefined(&self) -> bool {
        self.slots.iter().any(Option::is_none)
    }

    /// Iterates the concrete candidate predicates, skipping `⊥`, in
    /// ascending `(feature_index, threshold)` order.
    pub fn candidates(&self) -> impl Iterator<Item = SymbolicPredicate> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Keeps the candidates the query row satisfies — the refinement for
    /// the then-branch of an `x models phi` conditional. The `⊥` member
    /// has no models relation and is dropped from both refinements; if
    /// nothing survives, the branch is unreachable and the result is
    /// bottom.
    pub fn meet_x_models(&self, x: &FeatureVector, schema: &FeatureSchema) -> Self {
        let slots = self
            .slots
            .iter()
            .filter(|slot| slot.is_some_and(|p| p.models(x, schema)))
            .copied()
            .collect();
        Self { slots }
    }

    /// Keeps the candidates the query row does not satisfy — the
    /// refinement for the else-branch.
    pub fn meet_x_not_models(&self, x: &FeatureVector, schema: &FeatureSchema) -> Self {
        let slots = self
            .slots
            .iter()
            .filter(|slot| slot.is_some_and(|p| !p.models(x, schema)))
            .copied()
            .collect();
        Self { slots }
    }

    /// Join: the set union of both sides' slots. `⊥` is idempotent under
    /// union like any other member; bottom (the empty collection) is the
    /// identity.
    pub fn join(&self, other: &Self) -> Self {
        let mut slots = self.slots.clone();
        slots.extend(other.slots.iter().copied());
        canonicalize(&mut slots);
        Self { slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FeatureKind;

    #[test]
    fn bottom_is_empty() {
        let p = PredicateAbstraction::bottom();
        assert!(p.is_bottom());
        assert_eq!(p.candidates().count(), 0);
    }

    #[test]
    fn undefined_is_a_singleton_containing_only_bottom() {
        let p = PredicateAbstraction::undefined();
        assert!(!p.is_bottom());
        assert!(p.contains_undefined());
        assert_eq!(p.candidates().count(), 0);
    }

    #[test]
    fn from_candidates_without_undefined_holds_only_concrete_predicates() {
        let p = PredicateAbstraction::from_candidates(vec![SymbolicPredicate::new(0, 1.0)], false);
        assert!(!p.contains_undefined());
        assert_eq!(p.candidates().collect::<Vec<_>>(), vec![SymbolicPredicate::new(0, 1.0)]);
    }

    #[test]
    fn from_candidates_with_undefined_adds_the_bottom_slot() {
        let p = PredicateAbstraction::from_candidates(
            vec![SymbolicPredicate::new(0, 1.0), SymbolicPredicate::new(1, 2.0)],
            true,
        );
        assert!(p.contains_undefined());
        assert_eq!(p.candidates().count(), 2);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn join_unions_candidates_from_both_sides_without_duplicating() {
        let a = PredicateAbstraction::from_candidates(vec![SymbolicPredicate::new(0, 1.0)], false);
        let b = PredicateAbstraction::from_candidates(vec![SymbolicPredicate::new(0, 1.0)], true);
        let j = a.join(&b);
        assert_eq!(j.candidates().count(), 1);
        assert!(j.contains_undefined());
    }

    #[test]
    fn join_is_order_insensitive() {
        let a = PredicateAbstraction::from_candidates(
            vec![SymbolicPredicate::new(1, 2.0), SymbolicPredicate::new(0, 1.0)],
            false,
        );
        let b = PredicateAbstraction::from_candidates(vec![SymbolicPredicate::new(2, 0.5)], true);
        assert_eq!(a.join(&b), b.join(&a));
    }

    #[test]
    fn join_with_bottom_is_identity() {
        let a = PredicateAbstraction::from_candidates(vec![SymbolicPredicate::new(0, 1.0)], true);
        let bottom = PredicateAbstraction::bottom();
        assert_eq!(a.join(&bottom), a);
        assert_eq!(bottom.join(&a), a);
    }

    #[test]
    fn meet_x_models_splits_candidates_by_the_query_row() {
        let schema = FeatureSchema::new(
            vec![FeatureKind::Numeric { cut_points: vec![1.0, 3.0] }],
            2,
        );
        let x = FeatureVector::new(vec![2.0], 0);
        let phi = PredicateAbstraction::from_candidates(
            vec![SymbolicPredicate::new(0, 1.0), SymbolicPredicate::new(0, 3.0)],
            true,
        );
        let models = phi.meet_x_models(&x, &schema);
        assert_eq!(models.candidates().collect::<Vec<_>>(), vec![SymbolicPredicate::new(0, 3.0)]);
        assert!(!models.contains_undefined());
        let not_models = phi.meet_x_not_models(&x, &schema);
        assert_eq!(not_models.candidates().collect::<Vec<_>>(), vec![SymbolicPredicate::new(0, 1.0)]);
    }

    #[test]
    fn meet_x_models_on_only_undefined_is_bottom() {
        let schema = FeatureSchema::new(vec![FeatureKind::Boolean], 2);
        let x = FeatureVector::new(vec![0.0], 0);
        let phi = PredicateAbstraction::undefined();
        assert!(phi.meet_x_models(&x, &schema).is_bottom());
        assert!(phi.meet_x_not_models(&x, &schema).is_bottom());
    }
}
