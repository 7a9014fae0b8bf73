//! Storage layer for stocktag.
//!
//! This module persists the item records and the location list as two
//! independent JSON files. Each save rewrites the whole file atomically; each
//! load reads the whole file, treating a missing file as empty.

pub mod atomic;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::item::Item;
use crate::locations::LocationSet;

pub use atomic::write_atomic;

/// Flat-file storage for the records and locations files.
#[derive(Debug, Clone)]
pub struct Storage {
    /// Path to the records file.
    records_path: PathBuf,
    /// Path to the locations file.
    locations_path: PathBuf,
}

impl Storage {
    /// Create storage backed by the given files.
    ///
    /// Nothing is read or created until the first load or save.
    #[must_use]
    pub fn new(records_path: impl Into<PathBuf>, locations_path: impl Into<PathBuf>) -> Self {
        Self {
            records_path: records_path.into(),
            locations_path: locations_path.into(),
        }
    }

    /// Get the path to the records file.
    #[must_use]
    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    /// Get the path to the locations file.
    #[must_use]
    pub fn locations_path(&self) -> &Path {
        &self.locations_path
    }

    /// Load all item records.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_records(&self) -> Result<Vec<Item>> {
        let items: Vec<Item> = read_json(&self.records_path)?.unwrap_or_default();
        info!(
            "Loaded {} items from {}",
            items.len(),
            self.records_path.display()
        );
        Ok(items)
    }

    /// Overwrite the records file with `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_records(&self, items: &[Item]) -> Result<()> {
        let data = serde_json::to_vec(items)?;
        write_atomic(&self.records_path, &data)?;
        debug!(
            "Saved {} items to {}",
            items.len(),
            self.records_path.display()
        );
        Ok(())
    }

    /// Load the location list.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_locations(&self) -> Result<LocationSet> {
        let names: Vec<String> = read_json(&self.locations_path)?.unwrap_or_default();
        let locations: LocationSet = names.into_iter().collect();
        info!(
            "Loaded {} locations from {}",
            locations.len(),
            self.locations_path.display()
        );
        Ok(locations)
    }

    /// Overwrite the locations file with `locations`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_locations(&self, locations: &LocationSet) -> Result<()> {
        let data = serde_json::to_vec(locations)?;
        write_atomic(&self.locations_path, &data)?;
        debug!(
            "Saved {} locations to {}",
            locations.len(),
            self.locations_path.display()
        );
        Ok(())
    }
}

/// Read and parse a JSON file, `None` if it does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("{} does not exist yet", path.display());
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|source| Error::MalformedFile {
            path: path.to_path_buf(),
            source,
        })
}
