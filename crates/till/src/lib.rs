//! Till - point-of-sale bookkeeping on top of the tally aggregate tree.
//!
//! # Quick Start
//!
//! ```
//! use tally::Record;
//! use till::{Cart, InventoryStore, SalesLedger, StoreConfig};
//!
//! let mut store = InventoryStore::new(StoreConfig::with_capacity(16));
//! store.add_product(Record::new("Kopi", 8.0, "Drinks", "QR-KOPI")).unwrap();
//! store.add_product(Record::new("Roti", 12.0, "Bakery", "QR-ROTI")).unwrap();
//! assert_eq!(store.inventory_value(), 20.0);
//!
//! let mut cart = Cart::new();
//! cart.scan(&store, "QR-KOPI", 3).unwrap();
//!
//! let mut ledger = SalesLedger::new();
//! assert_eq!(ledger.checkout(&mut cart).unwrap(), 24.0);
//! ```
//!
//! The store and ledger are plain values with no internal locking. Share
//! them across threads behind a `Mutex`.

pub mod cart;
pub mod config;
pub mod error;
pub mod sales;
pub mod store;

pub use cart::{Cart, CartLine};
pub use config::StoreConfig;
pub use error::StoreError;
pub use sales::{
    group_by_category, summarize, CategoryTotals, ProductTotals, Sale, SalesLedger, SalesSummary,
};
pub use store::InventoryStore;
