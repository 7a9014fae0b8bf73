//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::action::ItemAction;
use crate::item::ItemForm;

/// Location list commands.
#[derive(Debug, Subcommand)]
pub enum LocationCommand {
    /// Add a location to the list
    Add {
        /// Location name
        name: String,
    },

    /// Delete a location from the list (items keep it)
    Delete {
        /// Location name
        name: String,
    },

    /// List known locations
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Item commands.
#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    /// Create an item, or update the one with the same name
    Save(SaveCommand),
}

/// Entry form arguments.
#[derive(Debug, Args)]
pub struct SaveCommand {
    /// Item name (matched case-insensitively)
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Location, one of `stocktag location list`
    #[arg(short, long, default_value = "")]
    pub location: String,

    /// Price
    #[arg(short, long, default_value_t = 0.0)]
    pub price: f64,

    /// Notes
    #[arg(short, long, default_value = "")]
    pub misc: String,

    /// Photo to store with a new item (png, jpg or jpeg)
    #[arg(long, value_name = "FILE")]
    pub photo: Option<PathBuf>,
}

impl From<SaveCommand> for ItemForm {
    fn from(cmd: SaveCommand) -> Self {
        Self {
            name: cmd.name,
            location: cmd.location,
            price: cmd.price,
            misc: cmd.misc,
            photo: cmd.photo,
        }
    }
}

/// Single-item action arguments.
#[derive(Debug, Args)]
pub struct ActionCommand {
    /// The action to run
    #[arg(value_enum)]
    pub action: ActionArg,

    /// Name of the item
    pub name: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Part of the item name; empty lists everything
    #[arg(default_value = "")]
    pub query: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Action argument, one per menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    /// Generate the full-data QR code
    DataTag,
    /// Generate the name image
    NameImage,
    /// Show the item's location
    Locate,
    /// Show the name tag
    PrintTag,
    /// Show the photo
    PrintPhoto,
    /// Show the item data
    Show,
    /// Save the name image
    SaveNameImage,
    /// Save the name QR code
    SaveNameTag,
    /// Add the item's location to the location list
    SaveLocation,
}

impl From<ActionArg> for ItemAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::DataTag => Self::GenerateDataTag,
            ActionArg::NameImage => Self::GenerateNameImage,
            ActionArg::Locate => Self::FindLocation,
            ActionArg::PrintTag => Self::PrintTag,
            ActionArg::PrintPhoto => Self::PrintPhoto,
            ActionArg::Show => Self::PrintData,
            ActionArg::SaveNameImage => Self::SaveNameImage,
            ActionArg::SaveNameTag => Self::SaveNameTag,
            ActionArg::SaveLocation => Self::SaveLocation,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
