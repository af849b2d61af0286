//! the product "box" state domain, combining the training-set
//! abstraction and the predicate abstraction into the single
//! state the evaluator threads through a program. The posterior
//! abstraction is derived on demand by [`BoxState::summary`].
//!
//! `best_split` is the heart of the domain. Every candidate predicate
//! gets a Gini-gain *interval* covering the gain it achieves on every
//! concrete training set within the perturbation budget; candidates
//! whose gain is identically zero carry no information and are
//! discarded, and the rest survive into `Phi#` unless another candidate
//! strictly dominates them.

use std::sync::Arc;

use crate::determinism::float_normalize;
use crate::dropout::{ClassSensitivity, DropoutCounts, PerturbationBudget, TrainingSetAbstraction};
use crate::error::DtlError;
use crate::interval::Interval;
use crate::posterior::{self, PosteriorAbstraction};
use crate::predicate::SymbolicPredicate;
use crate::predicate_abstraction::PredicateAbstraction;
use crate::schema::{FeatureKind, FeatureSchema, FeatureVector};

#[derive(Debug, Clone, PartialEq)]
pub struct BoxState {
    pub training: TrainingSetAbstraction,
    pub predicate: PredicateAbstraction,
}

impl BoxState {
    /// The starting state: every row in play, and the current predicate
    /// undefined (no `bestSplit` has run yet).
    pub fn initial(num_rows: usize, budget: PerturbationBudget) -> Self {
        Self {
            training: TrainingSetAbstraction::full(num_rows, budget),
            predicate: PredicateAbstraction::undefined(),
        }
    }

    /// A state is bottom as soon as either component is: no surviving
    /// rows, or no predicate slot left after a refinement.
    pub fn is_bottom(&self) -> bool {
        self.training.is_bottom() || self.predicate.is_bottom()
    }

    pub fn bottom_like(&self) -> Self {
        Self {
            training: TrainingSetAbstraction::bottom_with(self.training.budget()),
            predicate: self.predicate.clone(),
        }
    }

    /// The Gini-gain interval for splitting the current training set by
    /// `predicate`, covering every concrete training set the abstraction
    /// admits. Degenerate to a point when every budget is zero.
    pub fn split_score(
        &self,
        rows: &Arc<[FeatureVector]>,
        schema: &FeatureSchema,
        predicate: SymbolicPredicate,
    ) -> Interval {
        let num_classes = schema.num_classes();
        let parent = self.training.widened_counts(rows, schema, num_classes);
        let (then_counts, else_counts) = self.training.split_counts(rows, schema, num_classes, predicate);

        let parent_impurity = gini_impurity(&parent);
        let then_impurity = gini_impurity(&then_counts);
        let else_impurity = gini_impurity(&else_counts);
        let then_weight = count_ratio(&then_counts.total, &parent.total);
        let else_weight = count_ratio(&else_counts.total, &parent.total);

        let weighted_lo = then_weight.lo() * then_impurity.lo() + else_weight.lo() * else_impurity.lo();
        let weighted_hi = then_weight.hi() * then_impurity.hi() + else_weight.hi() * else_impurity.hi();
        // Normalized bounds keep mathematically-equal scores byte-equal,
        // so ties in best_split never depend on summation order.
        Interval::new(
            float_normalize((parent_impurity.lo() - weighted_hi).max(0.0)),
            float_normalize((parent_impurity.hi() - weighted_lo).clamp(0.0, 1.0)),
        )
    }

    /// Every candidate whose score interval is not identically zero
    /// (exists-nontrivial), with its score, in ascending
    /// `(feature_index, threshold)` order.
    pub fn candidate_scores(
        &self,
        rows: &Arc<[FeatureVector]>,
        schema: &FeatureSchema,
    ) -> Vec<(SymbolicPredicate, Interval)> {
        let mut scored = Vec::new();
        if self.training.is_bottom() {
            return scored;
        }
        for (feature_index, kind) in schema.kinds().iter().enumerate() {
            // A boolean feature has the single candidate "feature is
            // true"; its threshold slot is a placeholder.
            let thresholds: &[f64] = match kind {
                FeatureKind::Boolean => &[0.0],
                FeatureKind::Numeric { cut_points } => cut_points,
            };
            for &threshold in thresholds {
                let candidate = SymbolicPredicate::new(feature_index, threshold);
                let score = self.split_score(rows, schema, candidate);
                if score.hi() > 0.0 {
                    scored.push((candidate, score));
                }
            }
        }
        scored
    }

    /// Computes `Phi#` for the current training set.
    ///
    /// Among the exists-nontrivial candidates, only those no other
    /// candidate strictly dominates can be the concrete best split, so
    /// only those are kept (ties included, in ascending order). The `⊥`
    /// slot joins them unless every exists-nontrivial candidate is also
    /// forall-nontrivial — only then is a best split guaranteed to exist
    /// in every concretization.
    pub fn best_split(&self, rows: &Arc<[FeatureVector]>, schema: &FeatureSchema) -> PredicateAbstraction {
        let scored = self.candidate_scores(rows, schema);
        if scored.is_empty() {
            return PredicateAbstraction::undefined();
        }
        let every_candidate_nontrivial = scored.iter().all(|(_, score)| score.lo() > 0.0);
        let best_guaranteed_gain = scored.iter().map(|(_, score)| score.lo()).fold(0.0_f64, f64::max);
        let possibly_best: Vec<SymbolicPredicate> = scored
            .iter()
            .filter(|(_, score)| score.hi() >= best_guaranteed_gain)
            .map(|(candidate, _)| *candidate)
            .collect();
        PredicateAbstraction::from_candidates(possibly_best, !every_candidate_nontrivial)
    }

    /// `T# <- filter(T#, Phi#)`: the join of filtering by every candidate
    /// in `Phi#`. If `Phi#` contains `⊥`, the concrete best split may be
    /// undefined, in which case no filter applies — the unfiltered
    /// training set joins the result.
    pub fn filter(&self, rows: &Arc<[FeatureVector]>, schema: &FeatureSchema) -> Self {
        self.filter_with(rows, schema, true)
    }

    /// `T# <- filter(T#, not Phi#)`, same fold with the polarity flipped.
    pub fn filter_negated(&self, rows: &Arc<[FeatureVector]>, schema: &FeatureSchema) -> Self {
        self.filter_with(rows, schema, false)
    }

    fn filter_with(&self, rows: &Arc<[FeatureVector]>, schema: &FeatureSchema, polarity: bool) -> Self {
        let mut folded: Option<TrainingSetAbstraction> = None;
        for candidate in self.predicate.candidates() {
            let filtered = self.training.filter(rows, schema, candidate, polarity);
            folded = Some(match folded {
                None => filtered,
                Some(acc) => acc.join(&filtered),
            });
        }
        if self.predicate.contains_undefined() {
            folded = Some(match folded {
                None => self.training.clone(),
                Some(acc) => acc.join(&self.training),
            });
        }
        let training = folded.unwrap_or_else(|| TrainingSetAbstraction::bottom_with(self.training.budget()));
        Self { training, predicate: self.predicate.clone() }
    }

    pub fn summary(
        &self,
        rows: &Arc<[FeatureVector]>,
        schema: &FeatureSchema,
    ) -> Result<PosteriorAbstraction, DtlError> {
        let counts = self.training.widened_counts(rows, schema, schema.num_classes());
        posterior::summary(&counts)
    }

    /// Narrows to bottom unless some class `c*` could end up as the
    /// training set's only label: every other class's rows could be
    /// dropped or relabeled to `c*` within the combined drop/flip
    /// budget. Where such classes exist, the references narrow to the
    /// rows that could belong to a pure set.
    pub fn meet_impurity_equals_zero(&self, rows: &Arc<[FeatureVector]>, schema: &FeatureSchema) -> Self {
        if self.is_bottom() {
            return self.clone();
        }
        let exact = self.training.base_counts(rows, schema.num_classes());
        let total: usize = exact.iter().sum();
        let budget = self.training.budget();
        let removable = budget.num_dropout + budget.num_label_flip;
        let pure_possible: Vec<usize> = (0..exact.len()).filter(|&c| total - exact[c] <= removable).collect();
        if pure_possible.is_empty() {
            self.bottom_like()
        } else {
            Self {
                training: self.training.pure_set_restriction(rows, &pure_possible),
                predicate: self.predicate.clone(),
            }
        }
    }

    /// Narrows to bottom unless the training set could still be impure:
    /// more than one class already present, or a label flip or addition
    /// could introduce a second class.
    pub fn meet_impurity_not_equals_zero(&self, rows: &Arc<[FeatureVector]>, schema: &FeatureSchema) -> Self {
        if self.is_bottom() {
            return self.clone();
        }
        let num_classes = schema.num_classes();
        let exact = self.training.base_counts(rows, num_classes);
        let total: usize = exact.iter().sum();
        let present: Vec<usize> = (0..num_classes).filter(|&c| exact[c] > 0).collect();
        let budget = self.training.budget();

        let already_impure = present.len() > 1;
        let flip_could_diversify = budget.num_label_flip > 0
            && num_classes > 1
            && total >= 2
            && match budget.flip_sensitivity {
                ClassSensitivity::Any => true,
                ClassSensitivity::FromTo(from, to) => from != to && present.contains(&from),
            };
        let addition_could_diversify = budget.num_add > 0
            && match budget.add_sensitivity {
                ClassSensitivity::Any => num_classes > 1,
                ClassSensitivity::FromTo(_, to) => present != vec![to],
            };

        if already_impure || flip_could_diversify || addition_could_diversify {
            self.clone()
        } else {
            self.bottom_like()
        }
    }

    pub fn join(&self, other: &Self) -> Self {
        if self.is_bottom() {
            return other.clone();
        }
        if other.is_bottom() {
            return self.clone();
        }
        Self { training: self.training.join(&other.training), predicate: self.predicate.join(&other.predicate) }
    }
}

/// Ratio of two count intervals, `[0, 1]` when the denominator could be
/// zero — a count of an empty-able set bounds nothing tighter.
fn count_ratio(numerator: &Interval, denominator: &Interval) -> Interval {
    if denominator.lo() <= 0.0 {
        return Interval::new(0.0, 1.0);
    }
    Interval::div_monotone(numerator, denominator)
        .unwrap_or_else(|_| Interval::new(0.0, 1.0))
        .clamp_unit()
}

/// Gini impurity interval `1 - sum_c p_c^2` over the per-class ratio
/// intervals. A definitely-empty set is pure by convention.
fn gini_impurity(counts: &DropoutCounts) -> Interval {
    if counts.total.hi() <= 0.0 {
        return Interval::point(0.0);
    }
    let mut squares_lo = 0.0;
    let mut squares_hi = 0.0;
    for (_, count) in counts.per_class.iter() {
        let ratio = count_ratio(count, &counts.total);
        squares_lo += ratio.lo() * ratio.lo();
        squares_hi += ratio.hi() * ratio.hi();
    }
    Interval::new((1.0 - squares_hi).max(0.0), (1.0 - squares_lo).clamp(0.0, 1.0))
}
