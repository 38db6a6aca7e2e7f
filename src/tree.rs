//! Indexed aggregate tree.
//!
//! A segment tree over a fixed number of slots. Each slot holds a
//! [`Record`]; each internal node caches the [`Aggregate`] of the slots it
//! covers, so any contiguous range can be summarized by visiting
//! O(log n) nodes.
//!
//! Nodes live in a flat array using the implicit layout: the root is node
//! 1, and node `i` has children `2i` and `2i + 1`. The array holds
//! `4 * size` entries, which is enough for any `size` without rounding up
//! to a power of two.
//!
//! Complexity:
//! - new / build: O(n)
//! - set: O(log n)
//! - range queries: O(log n)
//!
//! Every slot starts as a zero-priced record and counts as real data: a
//! fresh tree of size 4 has `range_min(0, 3) == 0.0`. The owner is
//! responsible for only querying the slots it has populated.
//!
//! The size never changes. Removing a slot shifts every later index, so
//! the owner rebuilds a fresh tree instead.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::aggregate::{Aggregate, Bounded, Extent, Sum};
use crate::error::TreeError;
use crate::record::Record;

/// Tree tracking only the price sum.
pub type SumTree = IndexedAggregateTree<Sum>;

/// Tree tracking price sum, min and max.
pub type ExtentTree = IndexedAggregateTree<Extent>;

/// Sum, min and max over a range, with empty ranges reported as zeros.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    /// Convert an aggregate, mapping the empty-range sentinels to zero.
    pub fn of<A: Bounded>(agg: &A) -> Stats {
        if agg.is_identity() {
            return Stats::default();
        }
        return Stats {
            sum: agg.sum(),
            min: agg.min(),
            max: agg.max(),
        };
    }
}

/// A fixed-capacity, index-addressable segment tree of records.
#[derive(Clone, Debug)]
pub struct IndexedAggregateTree<A: Aggregate = Sum> {
    size: usize,
    nodes: Vec<A>,
    records: Vec<Record>,
}

impl<A: Aggregate> IndexedAggregateTree<A> {
    /// Create a tree of `size` zero-priced slots.
    pub fn new(size: usize) -> Self {
        let mut tree = IndexedAggregateTree {
            size,
            nodes: vec![A::identity(); 4 * size],
            records: vec![Record::zero(); size],
        };
        tree.build_all();
        return tree;
    }

    /// Create a tree whose slot `i` holds `records[i]`.
    ///
    /// Fails if `records.len() != size` or any price is invalid.
    pub fn build(size: usize, records: Vec<Record>) -> Result<Self, TreeError> {
        if records.len() != size {
            return Err(TreeError::InvalidArgument {
                expected: size,
                actual: records.len(),
            });
        }
        let mut total = 0.0;
        for (index, record) in records.iter().enumerate() {
            check_price(index, record)?;
            total += record.price;
            if !total.is_finite() {
                return Err(TreeError::SumOverflow { index });
            }
        }

        let mut tree = IndexedAggregateTree {
            size,
            nodes: vec![A::identity(); 4 * size],
            records,
        };
        tree.build_all();
        debug!(size, total = tree.total_sum(), "built aggregate tree");
        return Ok(tree);
    }

    /// Build a tree sized exactly to `records`.
    pub fn from_records(records: Vec<Record>) -> Result<Self, TreeError> {
        let size = records.len();
        return Self::build(size, records);
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        return self.size;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.size == 0;
    }

    /// All slot records, in slot order.
    pub fn records(&self) -> &[Record] {
        return &self.records;
    }

    /// The record at `index`.
    pub fn get(&self, index: usize) -> Result<&Record, TreeError> {
        self.check_range(index, index)?;
        return Ok(&self.records[index]);
    }

    /// Replace the record at `index` and refresh every ancestor.
    pub fn set(&mut self, index: usize, record: Record) -> Result<(), TreeError> {
        self.check_range(index, index)?;
        check_price(index, &record)?;
        trace!(index, price = record.price, "set slot");

        // Walk down to the leaf, remembering the path.
        let mut path: SmallVec<[usize; 32]> = SmallVec::new();
        let (mut node, mut l, mut r) = (1, 0, self.size - 1);
        while l != r {
            path.push(node);
            let mid = l + (r - l) / 2;
            if index <= mid {
                node = 2 * node;
                r = mid;
            } else {
                node = 2 * node + 1;
                l = mid + 1;
            }
        }

        self.nodes[node] = A::leaf(&record);
        let old = std::mem::replace(&mut self.records[index], record);
        for &ancestor in path.iter().rev() {
            self.pull(ancestor);
        }

        // Prices are non-negative, so only the root can be the first to overflow.
        if !self.nodes[1].sum().is_finite() {
            self.nodes[node] = A::leaf(&old);
            self.records[index] = old;
            for &ancestor in path.iter().rev() {
                self.pull(ancestor);
            }
            return Err(TreeError::SumOverflow { index });
        }
        return Ok(());
    }

    /// The combined aggregate over slots `lo..=hi`.
    pub fn range(&self, lo: usize, hi: usize) -> Result<A, TreeError> {
        self.check_range(lo, hi)?;
        trace!(lo, hi, "range query");
        return Ok(self.query(1, 0, self.size - 1, lo, hi));
    }

    /// Sum of prices over slots `lo..=hi`.
    pub fn range_sum(&self, lo: usize, hi: usize) -> Result<f64, TreeError> {
        return Ok(self.range(lo, hi)?.sum());
    }

    /// Sum of prices over every slot, 0 for an empty tree.
    pub fn total_sum(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        return self.nodes[1].sum();
    }

    fn check_range(&self, lo: usize, hi: usize) -> Result<(), TreeError> {
        if lo > hi || hi >= self.size {
            return Err(TreeError::IndexOutOfRange {
                lo,
                hi,
                size: self.size,
            });
        }
        return Ok(());
    }

    fn build_all(&mut self) {
        if self.size > 0 {
            self.build_node(1, 0, self.size - 1);
        }
    }

    fn build_node(&mut self, node: usize, l: usize, r: usize) {
        if l == r {
            self.nodes[node] = A::leaf(&self.records[l]);
            return;
        }
        let mid = l + (r - l) / 2;
        self.build_node(2 * node, l, mid);
        self.build_node(2 * node + 1, mid + 1, r);
        self.pull(node);
    }

    /// Recompute `node` from its two children.
    #[inline]
    fn pull(&mut self, node: usize) {
        self.nodes[node] = self.nodes[2 * node].combine(&self.nodes[2 * node + 1]);
    }

    fn query(&self, node: usize, l: usize, r: usize, lo: usize, hi: usize) -> A {
        if hi < l || r < lo {
            return A::identity();
        }
        if lo <= l && r <= hi {
            return self.nodes[node].clone();
        }
        let mid = l + (r - l) / 2;
        let left = self.query(2 * node, l, mid, lo, hi);
        let right = self.query(2 * node + 1, mid + 1, r, lo, hi);
        return left.combine(&right);
    }
}

impl<A: Bounded> IndexedAggregateTree<A> {
    /// Smallest price over slots `lo..=hi`.
    pub fn range_min(&self, lo: usize, hi: usize) -> Result<f64, TreeError> {
        let agg = self.range(lo, hi)?;
        if agg.is_identity() {
            return Ok(0.0);
        }
        return Ok(agg.min());
    }

    /// Largest price over slots `lo..=hi`.
    pub fn range_max(&self, lo: usize, hi: usize) -> Result<f64, TreeError> {
        let agg = self.range(lo, hi)?;
        if agg.is_identity() {
            return Ok(0.0);
        }
        return Ok(agg.max());
    }

    /// Sum, min and max over every slot.
    pub fn stats(&self) -> Stats {
        if self.size == 0 {
            return Stats::default();
        }
        return Stats::of(&self.nodes[1]);
    }

    /// Sum, min and max over slots `lo..=hi`.
    pub fn range_stats(&self, lo: usize, hi: usize) -> Result<Stats, TreeError> {
        return Ok(Stats::of(&self.range(lo, hi)?));
    }
}

fn check_price(index: usize, record: &Record) -> Result<(), TreeError> {
    if !record.has_valid_price() {
        return Err(TreeError::InvalidPrice {
            index,
            price: record.price,
        });
    }
    return Ok(());
}
