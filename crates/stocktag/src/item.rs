//! Core item types for stocktag.
//!
//! This module defines the item record as it is stored on disk and the entry
//! form used to create or update one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One tracked item.
///
/// The field names and layout match the records file, one JSON object per
/// item. `picture_path` is written as an empty string when there is no photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item name; unique under case-insensitive comparison.
    pub name: String,

    /// Storage location the item was last entered with.
    pub location: String,

    /// Non-negative price.
    pub price: f64,

    /// Free-text notes.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub misc: String,

    /// Name tag generated when the item was created.
    pub barcode_img: PathBuf,

    /// Uploaded photo, if one was given at creation.
    #[serde(default, with = "empty_path")]
    pub picture_path: Option<PathBuf>,
}

impl Item {
    /// Check whether this item's name equals `name`, ignoring case.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Check whether this item's name contains `needle`, ignoring case.
    ///
    /// An empty needle matches every item.
    #[must_use]
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Price rendered with two decimal places and a dollar sign.
    #[must_use]
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// The multi-line summary encoded into the full-data tag.
    #[must_use]
    pub fn data_summary(&self) -> String {
        format!(
            "Name: {}\nLocation: {}\nPrice: {}\nMisc: {}",
            self.name,
            self.location,
            self.display_price(),
            self.misc
        )
    }

    /// The photo path, only when it resolves to an existing file.
    #[must_use]
    pub fn existing_photo(&self) -> Option<&Path> {
        self.picture_path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty() && path.exists())
    }

    /// The user-visible fields of this item, without generated paths.
    #[must_use]
    pub fn details(&self) -> ItemDetails {
        ItemDetails {
            name: self.name.clone(),
            location: self.location.clone(),
            price: self.price,
            misc: self.misc.clone(),
        }
    }
}

/// The fields shown by the "print item data" action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    /// Item name.
    pub name: String,
    /// Storage location.
    pub location: String,
    /// Price.
    pub price: f64,
    /// Free-text notes.
    pub misc: String,
}

/// Input for creating or updating an item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemForm {
    /// Item name used for lookup and creation.
    pub name: String,
    /// Location chosen from the location list.
    pub location: String,
    /// Price.
    pub price: f64,
    /// Free-text notes.
    pub misc: String,
    /// Photo to store alongside a newly created item.
    pub photo: Option<PathBuf>,
}

impl ItemForm {
    /// Create a form with a name and location and no other fields.
    #[must_use]
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            ..Self::default()
        }
    }

    /// Set the price.
    #[must_use]
    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Set the notes.
    #[must_use]
    pub fn misc(mut self, misc: impl Into<String>) -> Self {
        self.misc = misc.into();
        self
    }

    /// Attach a photo.
    #[must_use]
    pub fn photo(mut self, photo: impl Into<PathBuf>) -> Self {
        self.photo = Some(photo.into());
        self
    }
}

/// Serializes `Option<PathBuf>` as a plain string, `""` meaning `None`.
mod empty_path {
    use std::path::PathBuf;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        path: &Option<PathBuf>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match path {
            Some(path) => serializer.serialize_str(&path.to_string_lossy()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<PathBuf>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()).map(PathBuf::from))
    }
}

/// Older records files hold `null` where a note was left blank.
fn null_as_empty<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
