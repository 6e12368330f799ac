//! Liquid asset registry.

use std::collections::BTreeMap;

use crate::asset::LiquidAsset;

/// Storage for liquid assets, keyed by base identifier, and the id counter.
pub trait LiquidAssetStore {
    fn get(&self, base_id: &str) -> Option<LiquidAsset>;

    /// Insert or replace the asset stored under its base identifier.
    fn put(&mut self, asset: LiquidAsset);

    fn remove(&mut self, base_id: &str) -> Option<LiquidAsset>;

    /// Number the next liquid asset will take.
    fn counter(&self) -> u64;

    fn set_counter(&mut self, counter: u64);

    /// Every stored asset, in base identifier order.
    fn all(&self) -> Vec<LiquidAsset>;
}

/// In-memory [`LiquidAssetStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryLiquidAssetStore {
    assets: BTreeMap<String, LiquidAsset>,
    counter: u64,
}

impl MemoryLiquidAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl LiquidAssetStore for MemoryLiquidAssetStore {
    fn get(&self, base_id: &str) -> Option<LiquidAsset> {
        self.assets.get(base_id).cloned()
    }

    fn put(&mut self, asset: LiquidAsset) {
        self.assets.insert(asset.base_id.clone(), asset);
    }

    fn remove(&mut self, base_id: &str) -> Option<LiquidAsset> {
        self.assets.remove(base_id)
    }

    fn counter(&self) -> u64 {
        self.counter
    }

    fn set_counter(&mut self, counter: u64) {
        self.counter = counter;
    }

    fn all(&self) -> Vec<LiquidAsset> {
        self.assets.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_remove() {
        let mut store = MemoryLiquidAssetStore::new();
        let asset = LiquidAsset::new(0, "aISLM", 10, vec![]).unwrap();
        store.put(asset.clone());
        assert_eq!(store.get("aLIQUID0"), Some(asset.clone()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove("aLIQUID0"), Some(asset));
        assert!(store.is_empty());
        assert_eq!(store.get("aLIQUID0"), None);
    }

    #[test]
    fn counter_starts_at_zero() {
        let mut store = MemoryLiquidAssetStore::new();
        assert_eq!(store.counter(), 0);
        store.set_counter(5);
        assert_eq!(store.counter(), 5);
    }

    #[test]
    fn put_replaces() {
        let mut store = MemoryLiquidAssetStore::new();
        store.put(LiquidAsset::new(2, "aISLM", 10, vec![]).unwrap());
        store.put(LiquidAsset::new(2, "aISLM", 20, vec![]).unwrap());
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.get("aLIQUID2").unwrap().start_time, 20);
    }
}
