//! the posterior class-probability abstraction, a
//! [`Distribution`](crate::distribution::Distribution) of
//! [`Interval`](crate::interval::Interval)s, one per class, each bounding
//! that class's true posterior probability under every dropout choice
//! the adversary's budget allows.

use crate::distribution::Distribution;
use crate::dropout::DropoutCounts;
use crate::error::DtlError;
use crate::interval::Interval;

pub type PosteriorAbstraction = Distribution<Interval>;

/// Computes `count_c / total` per class via monotone interval division.
/// Each class interval is divided by the shared total interval
/// independently, which is sound (if imprecise) since it ignores the
/// correlation between a class's count and the total.
///
/// When the dropout budget is large enough that the total count could
/// fall all the way to zero, the ratio is vacuous — we cannot bound a
/// division by a denominator that might be zero any tighter than `[0,
/// 1]`, so that is what every class gets in that case.
pub fn summary(counts: &DropoutCounts) -> Result<PosteriorAbstraction, DtlError> {
    if counts.total.hi() <= 0.0 {
        return Err(DtlError::EmptyAbstraction);
    }
    let vacuous = counts.total.lo() <= 0.0;
    let mut values = Vec::with_capacity(counts.per_class.num_classes());
    for (_, class_interval) in counts.per_class.iter() {
        let ratio = if vacuous {
            Interval::new(0.0, 1.0)
        } else {
            Interval::div_monotone(class_interval, &counts.total)?.clamp_unit()
        };
        values.push(ratio);
    }
    Ok(Distribution::from_values(values))
}
