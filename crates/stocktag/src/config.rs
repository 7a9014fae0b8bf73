//! Configuration management for stocktag.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "stocktag";

/// Default records file name.
const RECORDS_FILE_NAME: &str = "data.json";

/// Default locations file name.
const LOCATIONS_FILE_NAME: &str = "locations.json";

/// Default directory for generated and uploaded images.
const ITEMS_DIR_NAME: &str = "Items";

/// Largest accepted QR module size in pixels.
const MAX_QR_MODULE_SIZE: u32 = 100;

/// Largest accepted name canvas side in pixels.
const MAX_CANVAS_SIZE: u32 = 4096;

/// Side of an unscaled name image glyph.
const GLYPH_SIZE: u32 = 8;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `STOCKTAG_`, `__` between levels)
/// 2. TOML config file at `~/.config/stocktag/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Tag and image rendering configuration.
    pub render: RenderConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the item records file.
    /// Defaults to `~/.local/share/stocktag/data.json`
    pub records_path: Option<PathBuf>,
    /// Path to the locations file.
    /// Defaults to `~/.local/share/stocktag/locations.json`
    pub locations_path: Option<PathBuf>,
    /// Directory holding generated tags and uploaded photos.
    /// Defaults to `~/.local/share/stocktag/Items`
    pub items_dir: Option<PathBuf>,
}

/// Rendering configuration for generated images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pixels per QR module.
    pub qr_module_size: u32,
    /// Surround QR codes with the standard quiet zone.
    pub qr_quiet_zone: bool,
    /// Width of the name image canvas.
    pub canvas_width: u32,
    /// Height of the name image canvas.
    pub canvas_height: u32,
    /// Horizontal offset of the name text.
    pub text_x: u32,
    /// Vertical offset of the name text.
    pub text_y: u32,
    /// Integer scale applied to the 8x8 glyphs.
    pub text_scale: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            qr_module_size: 10,
            qr_quiet_zone: true,
            canvas_width: 300,
            canvas_height: 100,
            text_x: 10,
            text_y: 30,
            text_scale: 2,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("STOCKTAG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Build a configuration that keeps every file under `dir`.
    #[must_use]
    pub fn rooted_at(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            storage: StorageConfig {
                records_path: Some(dir.join(RECORDS_FILE_NAME)),
                locations_path: Some(dir.join(LOCATIONS_FILE_NAME)),
                items_dir: Some(dir.join(ITEMS_DIR_NAME)),
            },
            render: RenderConfig::default(),
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let render = &self.render;

        if render.qr_module_size == 0 || render.qr_module_size > MAX_QR_MODULE_SIZE {
            return Err(Error::config_validation(format!(
                "qr_module_size must be between 1 and {MAX_QR_MODULE_SIZE} (got {})",
                render.qr_module_size
            )));
        }

        if render.canvas_width == 0
            || render.canvas_height == 0
            || render.canvas_width > MAX_CANVAS_SIZE
            || render.canvas_height > MAX_CANVAS_SIZE
        {
            return Err(Error::config_validation(format!(
                "canvas dimensions must be between 1 and {MAX_CANVAS_SIZE} (got {}x{})",
                render.canvas_width, render.canvas_height
            )));
        }

        // A glyph must fit inside the canvas height
        let max_scale = (render.canvas_height / GLYPH_SIZE).max(1);
        if render.text_scale == 0 || render.text_scale > max_scale {
            return Err(Error::config_validation(format!(
                "text_scale must be between 1 and {max_scale} (got {})",
                render.text_scale
            )));
        }

        if render.text_x >= render.canvas_width || render.text_y >= render.canvas_height {
            return Err(Error::config_validation(format!(
                "text origin ({}, {}) lies outside the {}x{} canvas",
                render.text_x, render.text_y, render.canvas_width, render.canvas_height
            )));
        }

        Ok(())
    }

    /// Get the records file path, resolving defaults if not set.
    #[must_use]
    pub fn records_path(&self) -> PathBuf {
        self.storage
            .records_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(RECORDS_FILE_NAME))
    }

    /// Get the locations file path, resolving defaults if not set.
    #[must_use]
    pub fn locations_path(&self) -> PathBuf {
        self.storage
            .locations_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(LOCATIONS_FILE_NAME))
    }

    /// Get the items directory, resolving defaults if not set.
    #[must_use]
    pub fn items_dir(&self) -> PathBuf {
        self.storage
            .items_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(ITEMS_DIR_NAME))
    }
}
