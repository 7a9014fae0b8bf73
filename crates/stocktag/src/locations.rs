//! The list of known storage locations.

use serde::{Deserialize, Serialize};

/// Ordered set of location names.
///
/// Insertion order is preserved and duplicates are rejected with an exact,
/// case-sensitive comparison. Items keep their own copy of the location
/// string, so removing a location here never touches an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationSet {
    names: Vec<String>,
}

impl LocationSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a location at the end.
    ///
    /// Returns `false` without changing anything if `name` is empty or
    /// already present.
    pub fn add(&mut self, name: &str) -> bool {
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Remove a location. Returns `false` if it was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(index) => {
                self.names.remove(index);
                true
            }
            None => false,
        }
    }

    /// Check whether a location is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<String> for LocationSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.add(&name);
        }
        set
    }
}
