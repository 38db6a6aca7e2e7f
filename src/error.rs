//! Errors reported by the aggregate tree.

use thiserror::Error;

/// Error returned when a tree operation's precondition does not hold.
///
/// The tree rejects the call before touching any node, so the tree is
/// still valid after any of these errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// An index or range fell outside `[0, size)`, or `lo > hi`.
    /// Single-index operations report `lo == hi == index`.
    #[error("slot range [{lo}, {hi}] out of bounds for tree of size {size}")]
    IndexOutOfRange { lo: usize, hi: usize, size: usize },

    /// `build` was handed a record sequence of the wrong length.
    #[error("expected {expected} records, got {actual}")]
    InvalidArgument { expected: usize, actual: usize },

    /// A price that is negative, NaN or infinite.
    #[error("invalid price {price} for slot {index}")]
    InvalidPrice { index: usize, price: f64 },

    /// Accepting the price at `index` would push the total past `f64::MAX`.
    #[error("price at slot {index} overflows the tree total")]
    SumOverflow { index: usize },
}
