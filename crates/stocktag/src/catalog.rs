//! In-memory item catalog with name lookup.
//!
//! Items keep their insertion order. A lowercase-keyed index backs the
//! case-insensitive uniqueness of names.

use std::collections::HashMap;

use tracing::warn;

use crate::item::Item;

/// The item records of one session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    /// Lowercased name to position in `items`.
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from loaded records.
    ///
    /// If the records contain names that collide case-insensitively, the
    /// first one wins every lookup; the rest are kept but unreachable by
    /// name.
    #[must_use]
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let key = name_key(&item.name);
            if index.contains_key(&key) {
                warn!("Duplicate item name '{}' in records file", item.name);
                continue;
            }
            index.insert(key, position);
        }
        Self { items, index }
    }

    /// Find the item whose name equals `name`, ignoring case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        self.index.get(&name_key(name)).map(|&i| &self.items[i])
    }

    /// Mutable variant of [`Catalog::find_by_name`].
    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Item> {
        let position = *self.index.get(&name_key(name))?;
        Some(&mut self.items[position])
    }

    /// All items whose name contains `needle`, ignoring case, in insertion
    /// order. An empty needle returns everything.
    #[must_use]
    pub fn search_by_name(&self, needle: &str) -> Vec<&Item> {
        if needle.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| item.name_contains(needle))
            .collect()
    }

    /// Append a new item.
    ///
    /// Returns `false` and leaves the catalog unchanged if an item with the
    /// same name (ignoring case) already exists.
    pub fn insert(&mut self, item: Item) -> bool {
        let key = name_key(&item.name);
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.items.len());
        self.items.push(item);
        true
    }

    /// All items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn name_key(name: &str) -> String {
    name.to_lowercase()
}
