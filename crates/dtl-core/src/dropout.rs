//! the training-set abstraction `T#` under four independent kinds of
//! adversarial perturbation: row deletion, row addition, label flipping,
//! and numeric feature perturbation. Each is bounded by its own budget;
//! `widened_counts` and `split_counts` turn those budgets into per-class
//! count intervals that hold for every concrete perturbation within them.
//!
//! Feature perturbation is the subtle one. A perturbed row never changes
//! its label, but it can change which side of a cut point it falls on,
//! and therefore whether it survives a `filter`. The abstraction handles
//! this in two places: `filter` keeps every row that *could* satisfy the
//! predicate under some in-budget perturbation, and the count intervals
//! subtract a membership slack on the low side for rows that might not
//! really belong (they were kept only because they sit within the
//! perturbation radius of a cut).

use std::sync::Arc;

use crate::distribution::Distribution;
use crate::interval::Interval;
use crate::predicate::SymbolicPredicate;
use crate::references::DataReferences;
use crate::schema::{FeatureKind, FeatureSchema, FeatureVector};
use serde::{Deserialize, Serialize};

/// A class-sensitivity pair bounding which classes an addition or label
/// flip can move rows from/to. `Any` is the `(-1, -1)` sentinel from the
/// source representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassSensitivity {
    Any,
    FromTo(usize, usize),
}

impl ClassSensitivity {
    fn join(self, other: Self) -> Self {
        if self == other {
            self
        } else {
            ClassSensitivity::Any
        }
    }

    fn allows_from(self, class: usize) -> bool {
        match self {
            ClassSensitivity::Any => true,
            ClassSensitivity::FromTo(from, _) => from == class,
        }
    }

    fn allows_to(self, class: usize) -> bool {
        match self {
            ClassSensitivity::Any => true,
            ClassSensitivity::FromTo(_, to) => to == class,
        }
    }
}

/// The attacker's budget across all four perturbation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerturbationBudget {
    /// `n^d`: rows that may have been removed from the reference set.
    pub num_dropout: usize,
    /// `n^a`: rows that may have been added.
    pub num_add: usize,
    pub add_sensitivity: ClassSensitivity,
    /// `n^l`: labels that may have been flipped within the reference set.
    pub num_label_flip: usize,
    pub flip_sensitivity: ClassSensitivity,
    /// `n^f`: rows whose designated numeric feature may have been
    /// perturbed.
    pub num_feature_flip: usize,
    pub feature_flip_index: Option<usize>,
    /// `delta^f`: maximum perturbation magnitude.
    pub feature_flip_amount: f64,
}

impl PerturbationBudget {
    /// No perturbation at all — the starting budget for a program with
    /// an unperturbed training set.
    pub fn none() -> Self {
        Self {
            num_dropout: 0,
            num_add: 0,
            add_sensitivity: ClassSensitivity::Any,
            num_label_flip: 0,
            flip_sensitivity: ClassSensitivity::Any,
            num_feature_flip: 0,
            feature_flip_index: None,
            feature_flip_amount: 0.0,
        }
    }

    pub fn dropout_only(num_dropout: usize) -> Self {
        Self { num_dropout, ..Self::none() }
    }

    fn feature_flip_active(&self) -> bool {
        self.num_feature_flip > 0 && self.feature_flip_index.is_some()
    }

    /// Joins two budgets componentwise: counts widen to their max and
    /// disagreeing sensitivity pairs widen to `Any`. Every budget in a
    /// single evaluation originates from one configuration, so the two
    /// sides always name the same flip target; the `min` on disagreeing
    /// indices keeps the operation total and symmetric anyway.
    fn join(&self, other: &Self) -> Self {
        let feature_flip_index = match (self.feature_flip_index, other.feature_flip_index) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) | (None, Some(a)) => Some(a),
            (None, None) => None,
        };
        Self {
            num_dropout: self.num_dropout.max(other.num_dropout),
            num_add: self.num_add.max(other.num_add),
            add_sensitivity: self.add_sensitivity.join(other.add_sensitivity),
            num_label_flip: self.num_label_flip.max(other.num_label_flip),
            flip_sensitivity: self.flip_sensitivity.join(other.flip_sensitivity),
            num_feature_flip: self.num_feature_flip.max(other.num_feature_flip),
            feature_flip_index,
            feature_flip_amount: self.feature_flip_amount.max(other.feature_flip_amount),
        }
    }
}

/// Per-class count intervals plus the total count interval, produced by
/// [`TrainingSetAbstraction::widened_counts`] and
/// [`TrainingSetAbstraction::split_counts`].
#[derive(Debug, Clone, PartialEq)]
pub struct DropoutCounts {
    pub per_class: Distribution<Interval>,
    pub total: Interval,
}

/// Candidate rows plus the attacker's perturbation budget.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSetAbstraction {
    references: DataReferences,
    budget: PerturbationBudget,
}

impl TrainingSetAbstraction {
    pub fn new(references: DataReferences, budget: PerturbationBudget) -> Self {
        Self { references, budget }
    }

    pub fn full(n: usize, budget: PerturbationBudget) -> Self {
        Self { references: DataReferences::full(n), budget }
    }

    pub fn bottom_with(budget: PerturbationBudget) -> Self {
        Self { references: DataReferences::empty(), budget }
    }

    pub fn references(&self) -> &DataReferences {
        &self.references
    }

    pub fn budget(&self) -> PerturbationBudget {
        self.budget
    }

    pub fn dropout_budget(&self) -> usize {
        self.budget.num_dropout
    }

    pub fn is_bottom(&self) -> bool {
        self.references.is_empty()
    }

    /// Exact per-class counts over the surviving references, ignoring
    /// every perturbation budget.
    pub fn base_counts(&self, rows: &Arc<[FeatureVector]>, num_classes: usize) -> Vec<usize> {
        let mut counts = vec![0usize; num_classes];
        for i in self.references.iter() {
            counts[rows[i].class] += 1;
        }
        counts
    }

    /// Widens `base_counts` by the perturbation budget into the interval
    /// counts `summary` divides by. The low side additionally subtracts
    /// the membership slack: rows within the perturbation radius of a cut
    /// point of the flip feature may only be here because a perturbation
    /// moved them across an earlier filter's threshold.
    pub fn widened_counts(
        &self,
        rows: &Arc<[FeatureVector]>,
        schema: &FeatureSchema,
        num_classes: usize,
    ) -> DropoutCounts {
        let exact = self.base_counts(rows, num_classes);
        let (leave_slack, leave_total) = self.membership_slack(rows, schema, &self.references, num_classes);
        let no_entries = vec![0; num_classes];
        widen(&exact, self.budget, &leave_slack, leave_total, &no_entries, 0)
    }

    /// Splits by `predicate`, returning counts for the "models" half and
    /// the "doesn't model" half. Rows within `feature_flip_amount` of the
    /// cut could land on either side, so each half's upper bounds gain
    /// the other half's near-cut rows and its lower bounds lose its own.
    /// The two halves overlap — they are per-half upper bounds, not a
    /// partition.
    pub fn split_counts(
        &self,
        rows: &Arc<[FeatureVector]>,
        schema: &FeatureSchema,
        num_classes: usize,
        predicate: SymbolicPredicate,
    ) -> (DropoutCounts, DropoutCounts) {
        let then_refs = self.references.filter(rows, |x| predicate.models(x, schema));
        let else_refs = self.references.filter(rows, |x| !predicate.models(x, schema));

        let then_exact = count_by_class(rows, &then_refs, num_classes);
        let else_exact = count_by_class(rows, &else_refs, num_classes);

        let (then_leave, then_leave_total) = self.membership_slack(rows, schema, &then_refs, num_classes);
        let (else_leave, else_leave_total) = self.membership_slack(rows, schema, &else_refs, num_classes);

        let then_near = self.near_threshold_counts(rows, &then_refs, predicate, num_classes);
        let else_near = self.near_threshold_counts(rows, &else_refs, predicate, num_classes);

        let cap = self.budget.num_feature_flip;
        let enter_then: Vec<usize> = else_near.iter().map(|&c| c.min(cap)).collect();
        let enter_else: Vec<usize> = then_near.iter().map(|&c| c.min(cap)).collect();
        let enter_then_total = else_near.iter().sum::<usize>().min(cap);
        let enter_else_total = then_near.iter().sum::<usize>().min(cap);

        let then_counts =
            widen(&then_exact, self.budget, &then_leave, then_leave_total, &enter_then, enter_then_total);
        let else_counts =
            widen(&else_exact, self.budget, &else_leave, else_leave_total, &enter_else, enter_else_total);
        (then_counts, else_counts)
    }

    /// Restricts the reference set to rows consistent with `predicate`
    /// under `polarity`, keeping every row a feature perturbation could
    /// still place on the surviving side. The perturbation budget is
    /// carried forward unchanged — it is always reinterpreted relative to
    /// whatever references currently survive.
    pub fn filter(
        &self,
        rows: &Arc<[FeatureVector]>,
        schema: &FeatureSchema,
        predicate: SymbolicPredicate,
        polarity: bool,
    ) -> Self {
        let budget = self.budget;
        // Perturbation moves numeric values; a boolean feature has no
        // near-cut band to swing across.
        let swing_possible = matches!(schema.kind(predicate.feature_index), FeatureKind::Numeric { .. });
        let references = self.references.filter(rows, |x| {
            let matches = predicate.models(x, schema) == polarity;
            matches || (swing_possible && could_swing(&budget, predicate, x))
        });
        Self { references, budget }
    }

    /// Restricts to rows whose label lies in `classes`, used by
    /// `meet_impurity_equals_zero` once a candidate pure class set has
    /// been identified.
    pub fn pure_set_restriction(&self, rows: &Arc<[FeatureVector]>, classes: &[usize]) -> Self {
        Self {
            references: self.references.filter(rows, |x| classes.contains(&x.class)),
            budget: self.budget,
        }
    }

    /// Least upper bound: references union, budgets widen componentwise.
    /// The dropout budget additionally absorbs the reference difference:
    /// each side's concrete training sets only cover its own references,
    /// so the union must be allowed to drop down to either side's
    /// reachable minimum. A bottom abstraction is the identity regardless
    /// of its budget.
    pub fn join(&self, other: &Self) -> Self {
        if self.is_bottom() {
            return other.clone();
        }
        if other.is_bottom() {
            return self.clone();
        }
        let references = self.references.union(&other.references);
        let mut budget = self.budget.join(&other.budget);
        budget.num_dropout = (self.budget.num_dropout + (references.len() - self.references.len()))
            .max(other.budget.num_dropout + (references.len() - other.references.len()));
        Self { references, budget }
    }

    /// Per-class counts (and capped total) of `subset` rows whose flip
    /// feature sits within `feature_flip_amount` of any of that feature's
    /// cut points. These are the rows whose membership in the current
    /// reference set a perturbation could invalidate.
    fn membership_slack(
        &self,
        rows: &Arc<[FeatureVector]>,
        schema: &FeatureSchema,
        subset: &DataReferences,
        num_classes: usize,
    ) -> (Vec<usize>, usize) {
        let mut per_class = vec![0usize; num_classes];
        if !self.budget.feature_flip_active() {
            return (per_class, 0);
        }
        let Some(feature) = self.budget.feature_flip_index else {
            return (per_class, 0);
        };
        let cut_points = match schema.kind(feature) {
            FeatureKind::Numeric { cut_points } => cut_points.as_slice(),
            FeatureKind::Boolean => return (per_class, 0),
        };
        let delta = self.budget.feature_flip_amount;
        let mut total = 0usize;
        for i in subset.iter() {
            let v = rows[i].get(feature);
            if cut_points.iter().any(|&cut| (v - cut).abs() <= delta) {
                per_class[rows[i].class] += 1;
                total += 1;
            }
        }
        let cap = self.budget.num_feature_flip;
        for c in per_class.iter_mut() {
            *c = (*c).min(cap);
        }
        (per_class, total.min(cap))
    }

    /// Per-class counts of `subset` rows within the perturbation radius
    /// of `predicate`'s own threshold — the rows that could cross this
    /// particular cut.
    fn near_threshold_counts(
        &self,
        rows: &Arc<[FeatureVector]>,
        subset: &DataReferences,
        predicate: SymbolicPredicate,
        num_classes: usize,
    ) -> Vec<usize> {
        let mut counts = vec![0usize; num_classes];
        if !self.budget.feature_flip_active() || self.budget.feature_flip_index != Some(predicate.feature_index) {
            return counts;
        }
        for i in subset.iter() {
            if (rows[i].get(predicate.feature_index) - predicate.threshold).abs() <= self.budget.feature_flip_amount
            {
                counts[rows[i].class] += 1;
            }
        }
        counts
    }
}

fn could_swing(budget: &PerturbationBudget, predicate: SymbolicPredicate, x: &FeatureVector) -> bool {
    budget.feature_flip_active()
        && budget.feature_flip_index == Some(predicate.feature_index)
        && (x.get(predicate.feature_index) - predicate.threshold).abs() <= budget.feature_flip_amount
}

fn count_by_class(rows: &Arc<[FeatureVector]>, refs: &DataReferences, num_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; num_classes];
    for i in refs.iter() {
        counts[rows[i].class] += 1;
    }
    counts
}

/// Turns exact per-class counts into intervals covering every in-budget
/// perturbation. `lo_slack`/`hi_slack` carry the feature-perturbation
/// membership adjustments, which differ between the summary and split
/// paths.
fn widen(
    exact: &[usize],
    budget: PerturbationBudget,
    lo_slack: &[usize],
    total_lo_slack: usize,
    hi_slack: &[usize],
    total_hi_slack: usize,
) -> DropoutCounts {
    let num_classes = exact.len();
    let total_exact: usize = exact.iter().sum();

    let per_class = (0..num_classes)
        .map(|c| {
            let mut lo = exact[c] as i64 - budget.num_dropout as i64 - lo_slack[c] as i64;
            let mut hi = exact[c] as i64 + hi_slack[c] as i64;
            if budget.flip_sensitivity.allows_from(c) {
                lo -= budget.num_label_flip as i64;
            }
            if budget.flip_sensitivity.allows_to(c) {
                hi += budget.num_label_flip as i64;
            }
            if budget.add_sensitivity.allows_to(c) {
                hi += budget.num_add as i64;
            }
            Interval::new(lo.max(0) as f64, hi.max(0) as f64)
        })
        .collect();

    let total_lo = (total_exact as i64 - budget.num_dropout as i64 - total_lo_slack as i64).max(0) as f64;
    let total_hi = (total_exact + budget.num_add + total_hi_slack) as f64;
    DropoutCounts { per_class: Distribution::from_values(per_class), total: Interval::new(total_lo, total_hi) }
}
