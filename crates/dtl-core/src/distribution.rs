//! a finite categorical distribution `class -> value`, generic over a
//! value type that knows how to join with itself. Used both for a
//! concrete `Distribution<f64>` (in soundness-check tests) and the
//! abstract `Distribution<Interval>` posterior.

use serde::{Deserialize, Serialize};

/// Something that can be combined with another value of the same type to
/// produce their least upper bound, with a distinguished bottom element.
pub trait Join {
    fn bottom() -> Self;
    fn is_bottom(&self) -> bool;
    fn join(&self, other: &Self) -> Self;
}

impl Join for crate::interval::Interval {
    fn bottom() -> Self {
        crate::interval::Interval::empty()
    }
    fn is_bottom(&self) -> bool {
        self.is_empty()
    }
    fn join(&self, other: &Self) -> Self {
        crate::interval::Interval::join(self, other)
    }
}

impl Join for f64 {
    fn bottom() -> Self {
        0.0
    }
    fn is_bottom(&self) -> bool {
        *self == 0.0
    }
    fn join(&self, other: &Self) -> Self {
        self.max(*other)
    }
}

/// A categorical distribution indexed by class id (`0..num_classes`),
/// stored densely since the class set is small and fixed for a given
/// dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution<V> {
    values: Vec<V>,
}

impl<V: Clone + Join> Distribution<V> {
    /// A distribution over `num_classes` classes, every entry set to
    /// `V::bottom()`.
    pub fn bottom(num_classes: usize) -> Self {
        Self { values: (0..num_classes).map(|_| V::bottom()).collect() }
    }

    pub fn from_values(values: Vec<V>) -> Self {
        Self { values }
    }

    pub fn num_classes(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, class: usize) -> &V {
        &self.values[class]
    }

    pub fn set(&mut self, class: usize, value: V) {
        self.values[class] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &V)> {
        self.values.iter().enumerate()
    }

    /// `true` iff every class's value is bottom — the distribution of an
    /// unreachable path.
    pub fn is_bottom(&self) -> bool {
        self.values.iter().all(Join::is_bottom)
    }

    /// Pointwise join. Panics if the two distributions disagree on class
    /// count — that would mean they came from training sets with
    /// different schemas, which the evaluator never allows to mix.
    pub fn join(&self, other: &Self) -> Self {
        assert_eq!(
            self.values.len(),
            other.values.len(),
            "joined distributions must share a class count"
        );
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a.join(b))
            .collect();
        Self { values }
    }
}
