//! The per-slot value stored at a tree leaf.

use serde::{Deserialize, Serialize};

/// One product slot.
///
/// Only `price` is aggregated. The other fields travel with the record so
/// the tree can hand back what the inventory stored, but they never
/// affect ordering or any aggregate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub price: f64,
    pub category: String,
    /// Opaque scan payload, usually the product's QR string.
    pub tag: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        price: f64,
        category: impl Into<String>,
        tag: impl Into<String>,
    ) -> Record {
        return Record {
            name: name.into(),
            price,
            category: category.into(),
            tag: tag.into(),
        };
    }

    /// The record every slot holds before it is assigned.
    pub fn zero() -> Record {
        return Record::default();
    }

    /// A record carrying only a price.
    pub fn priced(price: f64) -> Record {
        return Record { price, ..Record::default() };
    }

    /// Whether the price can be aggregated without breaking min/max.
    ///
    /// This only checks the single price. The tree separately rejects a
    /// price that would overflow its running total.
    #[inline]
    pub fn has_valid_price(&self) -> bool {
        return self.price.is_finite() && self.price >= 0.0;
    }
}
