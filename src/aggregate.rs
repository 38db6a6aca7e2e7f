//! Aggregates cached at the internal nodes of the tree.
//!
//! An aggregate is a monoid over slot prices:
//! - `identity` is what a disjoint range contributes
//! - `leaf` lifts one record into the aggregate
//! - `combine` merges the aggregates of two adjacent ranges
//!
//! `combine` always derives the result from both inputs, so a parent can be
//! recomputed from its children at any time without drift.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// A summary value that can be cached per tree node.
pub trait Aggregate: Clone + Debug {
    /// Neutral element: `x.combine(&identity()) == x`.
    fn identity() -> Self;

    /// The aggregate of a single slot.
    fn leaf(record: &Record) -> Self;

    /// Combine the aggregates of two adjacent ranges.
    fn combine(&self, other: &Self) -> Self;

    /// Sum of prices over the covered range.
    fn sum(&self) -> f64;
}

/// An aggregate that also tracks the smallest and largest price.
pub trait Bounded: Aggregate {
    fn min(&self) -> f64;

    fn max(&self) -> f64;

    /// True when no slot contributed, i.e. the sentinels are still in place.
    fn is_identity(&self) -> bool {
        return self.min() > self.max();
    }
}

/// Sum-only aggregate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sum(pub f64);

impl Aggregate for Sum {
    #[inline]
    fn identity() -> Self {
        return Sum(0.0);
    }

    #[inline]
    fn leaf(record: &Record) -> Self {
        return Sum(record.price);
    }

    #[inline]
    fn combine(&self, other: &Self) -> Self {
        return Sum(self.0 + other.0);
    }

    #[inline]
    fn sum(&self) -> f64 {
        return self.0;
    }
}

/// Sum plus min/max aggregate.
///
/// The identity uses `+inf` for `min` and `-inf` for `max`. Those sentinels
/// only live in intermediate query results; a tree built from real
/// records never stores them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Aggregate for Extent {
    #[inline]
    fn identity() -> Self {
        return Extent {
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        };
    }

    #[inline]
    fn leaf(record: &Record) -> Self {
        return Extent {
            sum: record.price,
            min: record.price,
            max: record.price,
        };
    }

    #[inline]
    fn combine(&self, other: &Self) -> Self {
        return Extent {
            sum: self.sum + other.sum,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        };
    }

    #[inline]
    fn sum(&self) -> f64 {
        return self.sum;
    }
}

impl Bounded for Extent {
    #[inline]
    fn min(&self) -> f64 {
        return self.min;
    }

    #[inline]
    fn max(&self) -> f64 {
        return self.max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_aggregate() {
        let a = Sum(5.0);
        let b = Sum(3.0);
        assert_eq!(a.combine(&b), Sum(8.0));
        assert_eq!(a.combine(&Sum::identity()), a);
    }

    #[test]
    fn extent_aggregate() {
        let a = Extent::leaf(&Record::priced(7.0));
        let b = Extent::leaf(&Record::priced(2.0));
        let combined = a.combine(&b);
        assert_eq!(combined.sum, 9.0);
        assert_eq!(combined.min, 2.0);
        assert_eq!(combined.max, 7.0);
    }

    #[test]
    fn extent_identity_is_neutral() {
        let a = Extent::leaf(&Record::priced(4.0));
        assert_eq!(a.combine(&Extent::identity()), a);
        assert_eq!(Extent::identity().combine(&a), a);
        assert!(Extent::identity().is_identity());
        assert!(!a.is_identity());
    }

    #[test]
    fn zero_leaf_is_not_identity() {
        let zero = Extent::leaf(&Record::zero());
        assert!(!zero.is_identity());
        assert_eq!(zero.min(), 0.0);
        assert_eq!(zero.max(), 0.0);
    }
}
