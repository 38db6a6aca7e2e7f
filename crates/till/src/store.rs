//! Inventory store.
//!
//! Keeps the product list and an [`ExtentTree`] in lockstep: product `i`
//! always sits in tree slot `i`. Slots past the product count hold zero
//! records and are never queried.
//!
//! - add: O(log n), or O(n) when the tree has to grow
//! - price change: O(log n)
//! - remove: O(n), since every later slot index shifts and the tree is
//!   rebuilt from the remaining products
//! - tag/name lookup: O(1) average case (hash map)

use rustc_hash::FxHashMap;
use tally::{ExtentTree, Record, Stats, TreeError};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::StoreError;

#[derive(Clone, Debug)]
pub struct InventoryStore {
    config: StoreConfig,
    products: Vec<Record>,
    tree: ExtentTree,
    /// Product name to slot.
    by_name: FxHashMap<String, usize>,
    /// Scan tag to slot. The first product carrying a tag wins.
    by_tag: FxHashMap<String, usize>,
}

impl Default for InventoryStore {
    fn default() -> Self {
        return Self::new(StoreConfig::default());
    }
}

impl InventoryStore {
    /// Create an empty store with `config.capacity` zero slots.
    pub fn new(config: StoreConfig) -> InventoryStore {
        let tree = ExtentTree::new(config.capacity);
        return InventoryStore {
            config,
            products: Vec::new(),
            tree,
            by_name: FxHashMap::default(),
            by_tag: FxHashMap::default(),
        };
    }

    /// Create a store holding `products`, in order.
    pub fn from_products(
        config: StoreConfig,
        products: Vec<Record>,
    ) -> Result<InventoryStore, StoreError> {
        let mut store = Self::new(config);
        store.rebuild(products)?;
        return Ok(store);
    }

    /// Replace every product and build a fresh tree over them.
    ///
    /// On error the store keeps its previous contents.
    pub fn rebuild(&mut self, products: Vec<Record>) -> Result<(), StoreError> {
        let slots = self.config.slots_for(products.len())?;
        let (by_name, by_tag) = index(&products)?;
        self.tree = build_tree(slots, &products)?;
        self.products = products;
        self.by_name = by_name;
        self.by_tag = by_tag;
        info!(products = self.products.len(), slots, "rebuilt inventory");
        return Ok(());
    }

    /// Append a product and return its slot index.
    pub fn add_product(&mut self, record: Record) -> Result<usize, StoreError> {
        if self.by_name.contains_key(&record.name) {
            return Err(StoreError::DuplicateName(record.name));
        }
        let slot = self.products.len();
        if !record.has_valid_price() {
            return Err(TreeError::InvalidPrice { index: slot, price: record.price }.into());
        }

        if slot >= self.tree.len() {
            let slots = self.config.slots_for(slot + 1)?;
            info!(old = self.tree.len(), new = slots, "growing inventory tree");
            self.tree = build_tree(slots, &self.products)?;
        }
        self.tree.set(slot, record.clone())?;

        debug!(slot, name = %record.name, price = record.price, "added product");
        self.by_name.insert(record.name.clone(), slot);
        if !record.tag.is_empty() {
            self.by_tag.entry(record.tag.clone()).or_insert(slot);
        }
        self.products.push(record);
        return Ok(slot);
    }

    /// Remove the product called `name` and rebuild the tree.
    pub fn remove_product(&mut self, name: &str) -> Result<Record, StoreError> {
        let slot = match self.by_name.get(name) {
            Some(&slot) => slot,
            None => return Err(StoreError::UnknownProduct(name.to_string())),
        };

        let mut products = self.products.clone();
        let removed = products.remove(slot);
        let (by_name, by_tag) = index(&products)?;
        self.tree = build_tree(self.tree.len(), &products)?;
        self.products = products;
        self.by_name = by_name;
        self.by_tag = by_tag;

        debug!(slot, name, "removed product");
        return Ok(removed);
    }

    /// Replace the product in `slot`.
    pub fn update_product(&mut self, slot: usize, record: Record) -> Result<(), StoreError> {
        if slot >= self.products.len() {
            return Err(TreeError::IndexOutOfRange {
                lo: slot,
                hi: slot,
                size: self.products.len(),
            }
            .into());
        }
        if let Some(&other) = self.by_name.get(&record.name) {
            if other != slot {
                return Err(StoreError::DuplicateName(record.name));
            }
        }

        self.tree.set(slot, record.clone())?;
        let old = std::mem::replace(&mut self.products[slot], record);
        if old.name != self.products[slot].name || old.tag != self.products[slot].tag {
            let (by_name, by_tag) = index(&self.products)?;
            self.by_name = by_name;
            self.by_tag = by_tag;
        }
        debug!(slot, price = self.products[slot].price, "updated product");
        return Ok(());
    }

    /// Change the price of the product called `name`.
    pub fn set_price(&mut self, name: &str, price: f64) -> Result<(), StoreError> {
        let slot = match self.by_name.get(name) {
            Some(&slot) => slot,
            None => return Err(StoreError::UnknownProduct(name.to_string())),
        };
        let record = Record { price, ..self.products[slot].clone() };
        self.tree.set(slot, record.clone())?;
        self.products[slot] = record;
        return Ok(());
    }

    /// Look up a product by its scan tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Record> {
        return self.by_tag.get(tag).map(|&slot| &self.products[slot]);
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Record> {
        return self.by_name.get(name).map(|&slot| &self.products[slot]);
    }

    /// Slot index of the product called `name`.
    pub fn slot_of(&self, name: &str) -> Option<usize> {
        return self.by_name.get(name).copied();
    }

    /// Category of the product called `name`.
    pub fn category_of(&self, name: &str) -> Option<&str> {
        return self.find_by_name(name).map(|r| r.category.as_str());
    }

    /// Sum of every product's price.
    pub fn inventory_value(&self) -> f64 {
        return self.tree.total_sum();
    }

    /// Sum, min and max price over the stocked products, zeros when empty.
    pub fn price_stats(&self) -> Result<Stats, StoreError> {
        if self.products.is_empty() {
            return Ok(Stats::default());
        }
        return Ok(self.tree.range_stats(0, self.products.len() - 1)?);
    }

    /// Sum of prices over product slots `lo..=hi`.
    pub fn range_value(&self, lo: usize, hi: usize) -> Result<f64, StoreError> {
        if hi >= self.products.len() {
            return Err(TreeError::IndexOutOfRange {
                lo,
                hi,
                size: self.products.len(),
            }
            .into());
        }
        return Ok(self.tree.range_sum(lo, hi)?);
    }

    pub fn products(&self) -> &[Record] {
        return &self.products;
    }

    pub fn tree(&self) -> &ExtentTree {
        return &self.tree;
    }

    pub fn config(&self) -> &StoreConfig {
        return &self.config;
    }

    /// Number of tree slots.
    pub fn capacity(&self) -> usize {
        return self.tree.len();
    }

    pub fn len(&self) -> usize {
        return self.products.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.products.is_empty();
    }
}

fn build_tree(slots: usize, products: &[Record]) -> Result<ExtentTree, TreeError> {
    let mut records = Vec::with_capacity(slots);
    records.extend_from_slice(products);
    records.resize(slots, Record::zero());
    return ExtentTree::build(slots, records);
}

type Indexes = (FxHashMap<String, usize>, FxHashMap<String, usize>);

fn index(products: &[Record]) -> Result<Indexes, StoreError> {
    let mut by_name = FxHashMap::default();
    let mut by_tag = FxHashMap::default();
    for (slot, record) in products.iter().enumerate() {
        if by_name.insert(record.name.clone(), slot).is_some() {
            return Err(StoreError::DuplicateName(record.name.clone()));
        }
        if !record.tag.is_empty() {
            by_tag.entry(record.tag.clone()).or_insert(slot);
        }
    }
    return Ok((by_name, by_tag));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: f64, category: &str) -> Record {
        return Record::new(name, price, category, format!("QR-{}", name));
    }

    fn small_store() -> InventoryStore {
        let config = StoreConfig::with_capacity(4);
        return InventoryStore::from_products(
            config,
            vec![
                product("kopi", 10.0, "drinks"),
                product("teh", 20.0, "drinks"),
                product("roti", 30.0, "bakery"),
            ],
        )
        .unwrap();
    }

    #[test]
    fn add_assigns_next_slot() {
        let mut store = InventoryStore::new(StoreConfig::with_capacity(8));
        assert_eq!(store.add_product(product("a", 1.0, "x")).unwrap(), 0);
        assert_eq!(store.add_product(product("b", 2.0, "x")).unwrap(), 1);
        assert_eq!(store.inventory_value(), 3.0);
        assert_eq!(store.tree().get(1).unwrap().name, "b");
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut store = small_store();
        let err = store.add_product(product("kopi", 1.0, "drinks")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(name) if name == "kopi"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn invalid_price_rejected_before_insert() {
        let mut store = small_store();
        let err = store.add_product(product("gula", -5.0, "pantry")).unwrap_err();
        assert!(matches!(err, StoreError::Tree(TreeError::InvalidPrice { index: 3, .. })));
        assert_eq!(store.len(), 3);
        assert!(store.find_by_name("gula").is_none());
    }

    #[test]
    fn grows_when_full() {
        let mut store = small_store();
        store.add_product(product("susu", 40.0, "drinks")).unwrap();
        assert_eq!(store.capacity(), 4);
        store.add_product(product("gula", 50.0, "pantry")).unwrap();
        assert_eq!(store.capacity(), 8);
        assert_eq!(store.inventory_value(), 150.0);
        assert_eq!(store.range_value(3, 4).unwrap(), 90.0);
    }

    #[test]
    fn fixed_capacity_refuses() {
        let config = StoreConfig { capacity: 1, grow: false };
        let mut store = InventoryStore::new(config);
        store.add_product(product("a", 1.0, "x")).unwrap();
        let err = store.add_product(product("b", 2.0, "x")).unwrap_err();
        assert!(matches!(err, StoreError::CapacityExceeded { capacity: 1 }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_shifts_slots() {
        let mut store = small_store();
        let removed = store.remove_product("teh").unwrap();
        assert_eq!(removed.price, 20.0);
        assert_eq!(store.slot_of("roti"), Some(1));
        assert_eq!(store.tree().get(1).unwrap().name, "roti");
        assert_eq!(store.tree().get(2).unwrap(), &Record::zero());
        assert_eq!(store.inventory_value(), 40.0);
        assert!(store.find_by_tag("QR-teh").is_none());
        assert_eq!(store.find_by_tag("QR-roti").unwrap().name, "roti");
    }

    #[test]
    fn remove_unknown() {
        let mut store = small_store();
        assert!(matches!(
            store.remove_product("nasi"),
            Err(StoreError::UnknownProduct(_))
        ));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn price_change() {
        let mut store = small_store();
        store.set_price("teh", 5.0).unwrap();
        assert_eq!(store.inventory_value(), 45.0);
        assert_eq!(store.find_by_name("teh").unwrap().price, 5.0);

        assert!(store.set_price("teh", f64::NAN).is_err());
        assert_eq!(store.find_by_name("teh").unwrap().price, 5.0);
    }

    #[test]
    fn update_reindexes_tags() {
        let mut store = small_store();
        store.update_product(0, Record::new("kopi", 12.0, "drinks", "QR-NEW")).unwrap();
        assert!(store.find_by_tag("QR-kopi").is_none());
        assert_eq!(store.find_by_tag("QR-NEW").unwrap().price, 12.0);

        let err = store.update_product(0, product("teh", 1.0, "drinks")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));
        assert!(store.update_product(3, product("x", 1.0, "y")).is_err());
    }

    #[test]
    fn first_tag_wins() {
        let store = InventoryStore::from_products(
            StoreConfig::with_capacity(4),
            vec![
                Record::new("a", 1.0, "x", "SAME"),
                Record::new("b", 2.0, "x", "SAME"),
            ],
        )
        .unwrap();
        assert_eq!(store.find_by_tag("SAME").unwrap().name, "a");
    }

    #[test]
    fn stats_ignore_padding() {
        let store = small_store();
        let stats = store.price_stats().unwrap();
        assert_eq!(stats, Stats { sum: 60.0, min: 10.0, max: 30.0 });
        assert_eq!(InventoryStore::default().price_stats().unwrap(), Stats::default());
    }

    #[test]
    fn range_value_bounded_by_products() {
        let store = small_store();
        assert_eq!(store.range_value(1, 2).unwrap(), 50.0);
        assert!(store.range_value(0, 3).is_err());
    }

    #[test]
    fn rebuild_rejects_duplicates_and_keeps_state() {
        let mut store = small_store();
        let err = store
            .rebuild(vec![product("a", 1.0, "x"), product("a", 2.0, "x")])
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));
        assert_eq!(store.len(), 3);
        assert_eq!(store.inventory_value(), 60.0);
    }
}
