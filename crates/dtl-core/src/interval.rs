//! closed real intervals with the small amount of arithmetic the box
//! domain needs. This is hand-rolled rather than pulled from a
//! general-purpose interval-arithmetic crate — the core only ever adds,
//! subtracts, scales, divides by a positive scalar, takes min/max, and
//! joins, so a general-purpose library would buy nothing.

use crate::error::DtlError;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A closed interval `[lo, hi]` of reals. `lo > hi` represents the empty
/// interval (bottom for a per-class posterior value).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    lo: OrderedFloat<f64>,
    hi: OrderedFloat<f64>,
}

impl Interval {
    /// Build `[lo, hi]`. Swaps the bounds if given out of order so callers
    /// never have to pre-sort.
    pub fn new(lo: f64, hi: f64) -> Self {
        if lo <= hi {
            Self { lo: OrderedFloat(lo), hi: OrderedFloat(hi) }
        } else {
            Self { lo: OrderedFloat(hi), hi: OrderedFloat(lo) }
        }
    }

    /// The degenerate interval `[v, v]`.
    pub fn point(v: f64) -> Self {
        Self::new(v, v)
    }

    /// The empty interval, used as bottom for a per-class posterior value.
    pub fn empty() -> Self {
        Self { lo: OrderedFloat(1.0), hi: OrderedFloat(0.0) }
    }

    pub fn lo(&self) -> f64 {
        self.lo.0
    }

    pub fn hi(&self) -> f64 {
        self.hi.0
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    pub fn contains(&self, v: f64) -> bool {
        !self.is_empty() && self.lo.0 <= v && v <= self.hi.0
    }

    pub fn contains_zero(&self) -> bool {
        self.contains(0.0)
    }

    pub fn strictly_positive(&self) -> bool {
        !self.is_empty() && self.lo.0 > 0.0
    }

    pub fn strictly_negative(&self) -> bool {
        !self.is_empty() && self.hi.0 < 0.0
    }

    /// `true` iff every point of `self` is greater than every point of
    /// `other` — the strict-domination order used by `bestSplit`.
    pub fn strictly_dominates(&self, other: &Interval) -> bool {
        !self.is_empty() && !other.is_empty() && self.lo.0 > other.hi.0
    }

    pub fn add(&self, other: &Interval) -> Interval {
        if self.is_empty() || other.is_empty() {
            return Interval::empty();
        }
        Interval::new(self.lo.0 + other.lo.0, self.hi.0 + other.hi.0)
    }

    pub fn sub(&self, other: &Interval) -> Interval {
        if self.is_empty() || other.is_empty() {
            return Interval::empty();
        }
        Interval::new(self.lo.0 - other.hi.0, self.hi.0 - other.lo.0)
    }

    pub fn scale(&self, k: f64) -> Interval {
        if self.is_empty() {
            return Interval::empty();
        }
        if k >= 0.0 {
            Interval::new(self.lo.0 * k, self.hi.0 * k)
        } else {
            Interval::new(self.hi.0 * k, self.lo.0 * k)
        }
    }

    /// Division by a positive-scalar divisor interval `[lo, hi]` with
    /// `lo > 0`, using monotone interval division: numerator-min over
    /// denominator-max for the lower bound, numerator-max over
    /// denominator-min for the upper bound. Fails with `NumericError` if
    /// the divisor contains zero.
    pub fn div_monotone(numerator: &Interval, denominator: &Interval) -> Result<Interval, DtlError> {
        if denominator.is_empty() || denominator.contains_zero() {
            return Err(DtlError::NumericError);
        }
        if numerator.is_empty() {
            return Ok(Interval::empty());
        }
        let lo = numerator.lo.0 / denominator.hi.0;
        let hi = numerator.hi.0 / denominator.lo.0;
        Ok(Interval::new(lo, hi))
    }

    /// Clamp both bounds into `[0, 1]`.
    pub fn clamp_unit(&self) -> Interval {
        if self.is_empty() {
            return *self;
        }
        Interval::new(self.lo.0.clamp(0.0, 1.0), self.hi.0.clamp(0.0, 1.0))
    }

    /// Least upper bound: `[min(lo_a, lo_b), max(hi_a, hi_b)]`. Bottom
    /// (empty) is the join identity.
    pub fn join(&self, other: &Interval) -> Interval {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Interval::new(self.lo.0.min(other.lo.0), self.hi.0.max(other.hi.0))
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.hi.0 - self.lo.0
        }
    }
}
