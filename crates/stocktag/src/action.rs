//! The fixed menu of single-item actions.

use std::path::PathBuf;

use serde::Serialize;

use crate::item::ItemDetails;

/// An action run against one item, looked up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemAction {
    /// Generate the full-data QR tag and show it.
    GenerateDataTag,
    /// Generate the name image and show it.
    GenerateNameImage,
    /// Report where the item is stored.
    FindLocation,
    /// Show the name tag made at creation.
    PrintTag,
    /// Show the uploaded photo.
    PrintPhoto,
    /// Show the item's fields.
    PrintData,
    /// Regenerate the name image and report its path.
    SaveNameImage,
    /// Write the name QR tag and report its path.
    SaveNameTag,
    /// Add the item's location to the location list.
    SaveLocation,
}

impl ItemAction {
    /// Every action, in menu order.
    pub const ALL: [Self; 9] = [
        Self::GenerateDataTag,
        Self::GenerateNameImage,
        Self::FindLocation,
        Self::PrintTag,
        Self::PrintPhoto,
        Self::PrintData,
        Self::SaveNameImage,
        Self::SaveNameTag,
        Self::SaveLocation,
    ];
}

impl std::fmt::Display for ItemAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::GenerateDataTag => "Generate full-data QR code",
            Self::GenerateNameImage => "Generate name-based photo",
            Self::FindLocation => "Find item location from name",
            Self::PrintTag => "Print QR code",
            Self::PrintPhoto => "Print photo",
            Self::PrintData => "Print item data",
            Self::SaveNameImage => "Save name photo",
            Self::SaveNameTag => "Save name QR",
            Self::SaveLocation => "Save name to location",
        };
        f.write_str(label)
    }
}

/// What an action produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// An image to display.
    Image {
        /// Path to the image file.
        path: PathBuf,
        /// Caption to show with it.
        caption: &'static str,
    },
    /// An image was written to disk.
    Saved {
        /// What was written.
        what: &'static str,
        /// Where it was written.
        path: PathBuf,
    },
    /// The item's storage location.
    Location {
        /// The location.
        location: String,
    },
    /// The item's fields.
    Data {
        /// The fields.
        details: ItemDetails,
    },
    /// A location was added to the list.
    LocationAdded {
        /// The added location.
        location: String,
    },
    /// The location was already in the list.
    LocationExists {
        /// The location.
        location: String,
    },
    /// The item was entered without a location, so there is nothing to add.
    NoLocation {
        /// The item's name.
        name: String,
    },
}

impl std::fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image { path, caption } => write!(f, "{caption}: {}", path.display()),
            Self::Saved { what, path } => write!(f, "Saved {what} to: {}", path.display()),
            Self::Location { location } => write!(f, "Item location: {location}"),
            Self::Data { details } => match serde_json::to_string_pretty(details) {
                Ok(json) => f.write_str(&json),
                Err(_) => Err(std::fmt::Error),
            },
            Self::LocationAdded { location } => {
                write!(f, "Added '{location}' to location list.")
            }
            Self::LocationExists { location } => {
                write!(f, "'{location}' already exists in locations.")
            }
            Self::NoLocation { name } => write!(f, "'{name}' has no location to save."),
        }
    }
}
