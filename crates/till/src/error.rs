//! Errors reported by the inventory store, cart and ledger.

use tally::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The aggregate tree rejected the operation.
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("invalid store config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("a product named {0:?} already exists")]
    DuplicateName(String),

    #[error("no product named {0:?}")]
    UnknownProduct(String),

    /// No product carries the scanned tag.
    #[error("no product with tag {0:?}")]
    UnknownTag(String),

    #[error("inventory is full ({capacity} slots) and growth is disabled")]
    CapacityExceeded { capacity: usize },

    #[error("quantity for {product:?} must be at least 1")]
    InvalidQuantity { product: String },

    #[error("cart is empty")]
    EmptyCart,
}
