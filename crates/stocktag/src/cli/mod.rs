//! Command-line interface for stocktag.
//!
//! This module provides the CLI structure for the `stocktag` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ActionArg, ActionCommand, ConfigCommand, ItemCommand, LocationCommand, OutputFormat,
    SaveCommand, SearchCommand, StatusCommand,
};

/// stocktag - Track where your things are
///
/// Keeps a catalog of items with their location, price and notes, and prints
/// QR tags you can stick on them.
#[derive(Debug, Parser)]
#[command(name = "stocktag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the location list
    #[command(subcommand)]
    Location(LocationCommand),

    /// Create or update items
    #[command(subcommand)]
    Item(ItemCommand),

    /// Run an action on one item
    Action(ActionCommand),

    /// Search items by name
    Search(SearchCommand),

    /// Show item and location counts
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
