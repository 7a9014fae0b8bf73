//! Error types for stocktag.
//!
//! This module defines all error types used throughout the stocktag crate,
//! separating user-facing problems (bad input, unknown items) from fatal ones
//! (unreadable files, failed image encoding).

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for stocktag operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Input Errors ===
    /// The entry form was submitted without an item name.
    #[error("Please enter an item name.")]
    MissingName,

    /// The entry form was submitted without a location.
    #[error("Please select a location.")]
    MissingLocation,

    /// The location given at entry is not in the location list.
    #[error("unknown location '{location}'; add it with `stocktag location add` first")]
    UnknownLocation {
        /// The rejected location.
        location: String,
    },

    /// The price is negative or not a number.
    #[error("invalid price {price}: must be a non-negative number")]
    InvalidPrice {
        /// The rejected price.
        price: f64,
    },

    /// An uploaded photo has a file type that is not accepted.
    #[error("unsupported photo type '{extension}' (expected png, jpg or jpeg)")]
    UnsupportedUpload {
        /// The extension of the rejected file, without the dot.
        extension: String,
    },

    /// An uploaded photo does not exist.
    #[error("photo not found at {path}")]
    UploadMissing {
        /// Path that was given for the upload.
        path: PathBuf,
    },

    // === Lookup Errors ===
    /// No item matches the requested name.
    #[error("Item not found.")]
    ItemNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// The item has no photo, or its photo file is gone.
    #[error("No photo found for this item.")]
    PhotoMissing {
        /// Name of the item.
        name: String,
    },

    // === Storage Errors ===
    /// A persisted file exists but could not be parsed.
    #[error("malformed data file {path}: {source}")]
    MalformedFile {
        /// Path to the file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A persisted file could not be written.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        /// Path to the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Tag Generation Errors ===
    /// The content could not be encoded as a QR code.
    #[error("QR encoding failed: {0}")]
    QrEncode(#[from] qrcode::types::QrError),

    /// Writing a generated image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for stocktag operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an item-not-found error.
    #[must_use]
    pub fn item_not_found(name: impl Into<String>) -> Self {
        Self::ItemNotFound { name: name.into() }
    }

    /// Create a missing-photo error.
    #[must_use]
    pub fn photo_missing(name: impl Into<String>) -> Self {
        Self::PhotoMissing { name: name.into() }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error is a rejected entry form.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::MissingName
                | Self::MissingLocation
                | Self::UnknownLocation { .. }
                | Self::InvalidPrice { .. }
                | Self::UnsupportedUpload { .. }
                | Self::UploadMissing { .. }
        )
    }

    /// Check if this error is a failed lookup by name.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound { .. })
    }

    /// Check if this error should be shown to the user as a warning rather
    /// than ending the session.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        self.is_validation_error()
            || self.is_not_found()
            || matches!(self, Self::PhotoMissing { .. })
    }
}
