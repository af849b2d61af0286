//! Pure lattice-law checks, each a single boolean-returning function, used
//! by the property tests under `tests/` to fuzz the domain operators
//! rather than re-derive the laws from first principles in every test.

use crate::box_domain::BoxState;
use crate::distribution::Distribution;
use crate::dropout::TrainingSetAbstraction;
use crate::interval::Interval;
use crate::predicate_abstraction::PredicateAbstraction;

#[must_use]
pub fn interval_join_commutative(a: &Interval, b: &Interval) -> bool {
    a.join(b) == b.join(a)
}

#[must_use]
pub fn interval_join_associative(a: &Interval, b: &Interval, c: &Interval) -> bool {
    a.join(&b.join(c)) == a.join(b).join(c)
}

#[must_use]
pub fn interval_join_idempotent(a: &Interval) -> bool {
    a.join(a) == *a
}

#[must_use]
pub fn interval_join_has_empty_identity(a: &Interval) -> bool {
    a.join(&Interval::empty()) == *a && Interval::empty().join(a) == *a
}

#[must_use]
pub fn distribution_join_commutative(a: &Distribution<Interval>, b: &Distribution<Interval>) -> bool {
    a.join(b) == b.join(a)
}

#[must_use]
pub fn distribution_join_idempotent(a: &Distribution<Interval>) -> bool {
    a.join(a) == *a
}

#[must_use]
pub fn predicate_join_commutative(a: &PredicateAbstraction, b: &PredicateAbstraction) -> bool {
    a.join(b) == b.join(a)
}

#[must_use]
pub fn predicate_join_associative(
    a: &PredicateAbstraction,
    b: &PredicateAbstraction,
    c: &PredicateAbstraction,
) -> bool {
    a.join(&b.join(c)) == a.join(b).join(c)
}

#[must_use]
pub fn predicate_join_idempotent(a: &PredicateAbstraction) -> bool {
    a.join(a) == *a
}

#[must_use]
pub fn predicate_join_has_bottom_identity(a: &PredicateAbstraction) -> bool {
    let bottom = PredicateAbstraction::bottom();
    a.join(&bottom) == *a && bottom.join(a) == *a
}

#[must_use]
pub fn training_join_commutative(a: &TrainingSetAbstraction, b: &TrainingSetAbstraction) -> bool {
    a.join(b) == b.join(a)
}

#[must_use]
pub fn training_join_idempotent(a: &TrainingSetAbstraction) -> bool {
    a.join(a) == *a
}

#[must_use]
pub fn training_join_has_bottom_identity(a: &TrainingSetAbstraction, bottom: &TrainingSetAbstraction) -> bool {
    bottom.is_bottom() && a.join(bottom) == *a && bottom.join(a) == *a
}

#[must_use]
pub fn box_join_commutative(a: &BoxState, b: &BoxState) -> bool {
    a.join(b) == b.join(a)
}

#[must_use]
pub fn box_join_idempotent(a: &BoxState) -> bool {
    a.join(a) == *a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::SymbolicPredicate;

    #[test]
    fn interval_laws_hold_on_a_fixed_sample() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(0.5, 2.0);
        let c = Interval::new(-1.0, 0.2);
        assert!(interval_join_commutative(&a, &b));
        assert!(interval_join_associative(&a, &b, &c));
        assert!(interval_join_idempotent(&a));
        assert!(interval_join_has_empty_identity(&a));
    }

    #[test]
    fn predicate_laws_hold_on_a_fixed_sample() {
        let a = PredicateAbstraction::from_candidates(vec![SymbolicPredicate::new(0, 1.0)], false);
        let b = PredicateAbstraction::from_candidates(vec![SymbolicPredicate::new(1, 0.5)], true);
        let c = PredicateAbstraction::undefined();
        assert!(predicate_join_commutative(&a, &b));
        assert!(predicate_join_associative(&a, &b, &c));
        assert!(predicate_join_idempotent(&b));
        assert!(predicate_join_has_bottom_identity(&b));
    }
}
