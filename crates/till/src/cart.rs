//! Shopping cart filled by tag scans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally::{Record, TreeError};
use tracing::debug;

use crate::error::StoreError;
use crate::store::InventoryStore;

/// One scanned product with its quantity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_name: String,
    pub price: f64,
    pub qty: u32,
    pub total: f64,
    /// When the line was scanned.
    pub timestamp: DateTime<Utc>,
}

/// Lines waiting for checkout, in scan order.
///
/// Scanning the same product twice adds a second line.
#[derive(Clone, Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Cart {
        return Cart::default();
    }

    /// Add `qty` units of `record` at its current price, stamped now.
    pub fn add(&mut self, record: &Record, qty: u32) -> Result<&CartLine, StoreError> {
        return self.add_at(record, qty, Utc::now());
    }

    /// Add `qty` units of `record`, stamped with `timestamp`.
    pub fn add_at(
        &mut self,
        record: &Record,
        qty: u32,
        timestamp: DateTime<Utc>,
    ) -> Result<&CartLine, StoreError> {
        if qty == 0 {
            return Err(StoreError::InvalidQuantity { product: record.name.clone() });
        }
        let total = record.price * f64::from(qty);
        if !record.has_valid_price() || !total.is_finite() {
            let index = self.lines.len();
            return Err(TreeError::InvalidPrice { index, price: record.price }.into());
        }
        let line = CartLine {
            product_name: record.name.clone(),
            price: record.price,
            qty,
            total,
            timestamp,
        };
        debug!(product = %line.product_name, qty, total = line.total, "cart line added");
        self.lines.push(line);
        return Ok(&self.lines[self.lines.len() - 1]);
    }

    /// Look `tag` up in `store` and add the product it names.
    pub fn scan(
        &mut self,
        store: &InventoryStore,
        tag: &str,
        qty: u32,
    ) -> Result<&CartLine, StoreError> {
        let record = match store.find_by_tag(tag) {
            Some(record) => record,
            None => return Err(StoreError::UnknownTag(tag.to_string())),
        };
        return self.add(record, qty);
    }

    /// Sum of every line total.
    pub fn grand_total(&self) -> f64 {
        return self.lines.iter().map(|line| line.total).sum();
    }

    pub fn lines(&self) -> &[CartLine] {
        return &self.lines;
    }

    pub fn len(&self) -> usize {
        return self.lines.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.lines.is_empty();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub(crate) fn take_lines(&mut self) -> Vec<CartLine> {
        return std::mem::take(&mut self.lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use chrono::TimeZone;

    fn store() -> InventoryStore {
        return InventoryStore::from_products(
            StoreConfig::with_capacity(4),
            vec![
                Record::new("kopi", 8.5, "drinks", "QR-1"),
                Record::new("roti", 12.0, "bakery", "QR-2"),
            ],
        )
        .unwrap();
    }

    #[test]
    fn scan_and_total() {
        let store = store();
        let mut cart = Cart::new();

        let line = cart.scan(&store, "QR-1", 2).unwrap();
        assert_eq!(line.total, 17.0);
        cart.scan(&store, "QR-2", 1).unwrap();
        cart.scan(&store, "QR-1", 1).unwrap();

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.grand_total(), 37.5);
    }

    #[test]
    fn unknown_tag() {
        let store = store();
        let mut cart = Cart::new();
        assert!(matches!(
            cart.scan(&store, "QR-404", 1),
            Err(StoreError::UnknownTag(tag)) if tag == "QR-404"
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn zero_quantity() {
        let mut cart = Cart::new();
        let record = Record::new("kopi", 8.5, "drinks", "QR-1");
        assert!(matches!(cart.add(&record, 0), Err(StoreError::InvalidQuantity { .. })));
        assert!(cart.is_empty());
    }

    #[test]
    fn invalid_prices_rejected() {
        let mut cart = Cart::new();
        let negative = Record::new("x", -5.0, "misc", "");
        let nan = Record::new("y", f64::NAN, "misc", "");
        let huge = Record::new("z", f64::MAX, "misc", "");

        assert!(matches!(
            cart.add(&negative, 2),
            Err(StoreError::Tree(TreeError::InvalidPrice { .. }))
        ));
        assert!(matches!(
            cart.add(&nan, 1),
            Err(StoreError::Tree(TreeError::InvalidPrice { .. }))
        ));
        assert!(cart.add(&huge, 2).is_err());
        assert!(cart.is_empty());
        assert_eq!(cart.grand_total(), 0.0);
    }

    #[test]
    fn lines_are_stamped() {
        let mut cart = Cart::new();
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let line = cart.add_at(&Record::priced(2.0), 1, at).unwrap();
        assert_eq!(line.timestamp, at);

        let before = Utc::now();
        let line = cart.add(&Record::priced(2.0), 1).unwrap();
        assert!(line.timestamp >= before);
    }

    #[test]
    fn clear_empties() {
        let mut cart = Cart::new();
        cart.add(&Record::priced(3.0), 3).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.grand_total(), 0.0);
    }
}
