//! Inventory store configuration.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Sizing of the store's aggregate tree.
///
/// Missing fields in a JSON config fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of product slots the tree is built with.
    pub capacity: usize,
    /// Double the slot count when a new product does not fit. When false,
    /// adding past `capacity` fails with `CapacityExceeded`.
    pub grow: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        return StoreConfig {
            capacity: 1000,
            grow: true,
        };
    }
}

impl StoreConfig {
    pub fn with_capacity(capacity: usize) -> StoreConfig {
        return StoreConfig { capacity, ..StoreConfig::default() };
    }

    pub fn from_json(json: &str) -> Result<StoreConfig, StoreError> {
        return Ok(serde_json::from_str(json)?);
    }

    /// Slot count needed to hold `count` products.
    pub(crate) fn slots_for(&self, count: usize) -> Result<usize, StoreError> {
        if count <= self.capacity {
            return Ok(self.capacity);
        }
        if !self.grow {
            return Err(StoreError::CapacityExceeded { capacity: self.capacity });
        }
        let mut slots = self.capacity.max(1);
        while slots < count {
            slots *= 2;
        }
        return Ok(slots);
    }
}
