//! Tally - an indexed aggregate tree for product price tallies.
//!
//! # Quick Start
//!
//! ```
//! use tally::record::Record;
//! use tally::tree::ExtentTree;
//!
//! // Four product slots, all starting at price zero
//! let mut tree = ExtentTree::new(4);
//!
//! tree.set(0, Record::new("Kopi", 10.0, "Drinks", "QR-01")).unwrap();
//! tree.set(1, Record::new("Roti", 20.0, "Bakery", "QR-02")).unwrap();
//!
//! assert_eq!(tree.total_sum(), 30.0);
//! assert_eq!(tree.range_sum(1, 3).unwrap(), 20.0);
//! assert_eq!(tree.range_max(0, 1).unwrap(), 20.0);
//! ```

pub mod aggregate;
pub mod error;
pub mod record;
pub mod tree;

pub use aggregate::{Aggregate, Bounded, Extent, Sum};
pub use error::TreeError;
pub use record::Record;
pub use tree::{ExtentTree, IndexedAggregateTree, Stats, SumTree};
