//! `stocktag` - A single-user inventory tracker
//!
//! This library keeps a catalog of items and storage locations in flat JSON
//! files and generates QR tags and name images for each item.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod action;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod item;
pub mod locations;
pub mod logging;
pub mod session;
pub mod storage;
pub mod tags;

pub use action::{ActionOutcome, ItemAction};
pub use catalog::Catalog;
pub use config::Config;
pub use error::{Error, Result};
pub use item::{Item, ItemDetails, ItemForm};
pub use locations::LocationSet;
pub use logging::init_logging;
pub use session::{InventoryStats, SaveOutcome, Session};
pub use storage::Storage;
pub use tags::{TagGenerator, TagKind};
