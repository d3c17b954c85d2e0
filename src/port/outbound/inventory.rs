//! Inventory lookup port used by the aggregator.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::domain::{normalize_name, normalize_set};

/// The collection's knowledge of which printing a user owns.
#[async_trait]
pub trait InventorySets: Send + Sync {
    /// Set code of an owned printing of `name`, if any.
    async fn known_set(&self, name: &str) -> Option<String>;
}

/// Inventory that knows nothing; every set-less line prices as a wildcard.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInventory;

#[async_trait]
impl InventorySets for NoInventory {
    async fn known_set(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Owned printings keyed by card name, matched after normalization.
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    sets: HashMap<String, String>,
}

impl StaticInventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a printing of `name` from `set` is owned.
    pub fn insert(&mut self, name: &str, set: &str) {
        self.sets.insert(
            normalize_name(name),
            normalize_set(set),
        );
    }
}

#[async_trait]
impl InventorySets for StaticInventory {
    async fn known_set(&self, name: &str) -> Option<String> {
        self.sets
            .get(&normalize_name(name))
            .filter(|set| !set.is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_inventory_matches_normalized_names() {
        let mut inventory = StaticInventory::new();
        inventory.insert("Sol Ring", "c21");

        assert_eq!(inventory.known_set("  SOL ring").await.as_deref(), Some("C21"));
        assert_eq!(inventory.known_set("Mana Crypt").await, None);
        assert_eq!(NoInventory.known_set("Sol Ring").await, None);
    }
}
