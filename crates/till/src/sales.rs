//! Sales ledger and summaries.
//!
//! Checkout moves every cart line into the ledger. Summaries take the
//! sales plus a product-name to category lookup, usually
//! [`InventoryStore::category_of`](crate::store::InventoryStore::category_of).
//! Sales of products that no longer exist land in `"Uncategorized"`.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cart::{Cart, CartLine};
use crate::error::StoreError;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// A recorded cart line.
pub type Sale = CartLine;

#[derive(Clone, Debug, Default)]
pub struct SalesLedger {
    history: Vec<Sale>,
}

impl SalesLedger {
    pub fn new() -> SalesLedger {
        return SalesLedger::default();
    }

    /// Record every line in `cart`, empty it, and return the transaction
    /// total. An empty cart is rejected and nothing is recorded.
    pub fn checkout(&mut self, cart: &mut Cart) -> Result<f64, StoreError> {
        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        let lines = cart.take_lines();
        let total: f64 = lines.iter().map(|line| line.total).sum();
        info!(lines = lines.len(), total, "checkout");
        self.history.extend(lines);
        return Ok(total);
    }

    pub fn history(&self) -> &[Sale] {
        return &self.history;
    }

    /// History ordered by scan time, oldest first. Equal times keep
    /// recording order.
    pub fn history_by_time(&self) -> Vec<&Sale> {
        let mut sales: Vec<&Sale> = self.history.iter().collect();
        sales.sort_by_key(|sale| sale.timestamp);
        return sales;
    }

    pub fn len(&self) -> usize {
        return self.history.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.history.is_empty();
    }
}

/// Headline numbers over a set of sales.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub revenue: f64,
    pub quantity: u64,
    /// Category with the highest revenue; ties go to the smallest name.
    pub top_category: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductTotals {
    pub revenue: f64,
    pub quantity: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub revenue: f64,
    pub quantity: u64,
    pub products: BTreeMap<String, ProductTotals>,
}

/// Total revenue, total quantity and the top category by revenue.
pub fn summarize<'a, F>(sales: &[Sale], category_of: F) -> SalesSummary
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut summary = SalesSummary::default();
    let mut by_category: FxHashMap<String, f64> = FxHashMap::default();

    for sale in sales {
        summary.revenue += sale.total;
        summary.quantity += u64::from(sale.qty);
        let category = category_of(&sale.product_name).unwrap_or(UNCATEGORIZED);
        *by_category.entry(category.to_string()).or_insert(0.0) += sale.total;
    }

    let mut best: Option<(&String, f64)> = None;
    for (category, &revenue) in by_category.iter() {
        best = match best {
            Some((name, top)) if top > revenue || (top == revenue && name < category) => {
                Some((name, top))
            }
            _ => Some((category, revenue)),
        };
    }
    summary.top_category = best.map(|(name, _)| name.clone());
    return summary;
}

/// Revenue and quantity per category, and per product within it.
pub fn group_by_category<'a, F>(sales: &[Sale], category_of: F) -> BTreeMap<String, CategoryTotals>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut groups: BTreeMap<String, CategoryTotals> = BTreeMap::new();
    for sale in sales {
        let category = category_of(&sale.product_name).unwrap_or(UNCATEGORIZED);
        let group = groups.entry(category.to_string()).or_default();
        group.revenue += sale.total;
        group.quantity += u64::from(sale.qty);

        let product = group.products.entry(sale.product_name.clone()).or_default();
        product.revenue += sale.total;
        product.quantity += u64::from(sale.qty);
    }
    return groups;
}
