//! Application state for one interactive session.
//!
//! A [`Session`] owns the catalog, the location list, the storage files and
//! the tag generator. Every operation that changes the catalog or the
//! location list writes the affected file before returning.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::action::{ActionOutcome, ItemAction};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::item::{Item, ItemForm};
use crate::locations::LocationSet;
use crate::storage::Storage;
use crate::tags::{self, TagGenerator};

/// Result of saving the entry form.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// A new item was appended.
    Created(Item),
    /// An existing item had its location, price and notes replaced.
    Updated(Item),
}

impl SaveOutcome {
    /// The item as it is now stored.
    #[must_use]
    pub fn item(&self) -> &Item {
        match self {
            Self::Created(item) | Self::Updated(item) => item,
        }
    }

    /// Check whether a new item was created.
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

impl std::fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created(item) => write!(f, "Saved new item: '{}'", item.name),
            Self::Updated(item) => write!(f, "Updated existing item: '{}'", item.name),
        }
    }
}

/// Summary of the session's data and where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    /// Number of items.
    pub items: usize,
    /// Number of known locations.
    pub locations: usize,
    /// Number of items whose photo file exists.
    pub photos: usize,
    /// Records file.
    pub records_path: PathBuf,
    /// Locations file.
    pub locations_path: PathBuf,
    /// Directory of generated and uploaded images.
    pub items_dir: PathBuf,
}

/// The state of one session.
#[derive(Debug)]
pub struct Session {
    storage: Storage,
    tags: TagGenerator,
    catalog: Catalog,
    locations: LocationSet,
}

impl Session {
    /// Open a session using the paths and render settings in `config`.
    ///
    /// Creates the items directory if needed and loads both data files.
    ///
    /// # Errors
    ///
    /// Returns an error if the items directory cannot be created or a data
    /// file is unreadable or malformed.
    pub fn open(config: &Config) -> Result<Self> {
        let storage = Storage::new(config.records_path(), config.locations_path());
        let tags = TagGenerator::new(config.items_dir(), config.render.clone());
        Self::from_parts(storage, tags)
    }

    /// Open a session from already-built storage and generator.
    ///
    /// # Errors
    ///
    /// Same as [`Session::open`].
    pub fn from_parts(storage: Storage, tags: TagGenerator) -> Result<Self> {
        tags.ensure_items_dir()?;
        let catalog = Catalog::from_items(storage.load_records()?);
        let locations = storage.load_locations()?;
        debug!(
            "Session opened with {} items and {} locations",
            catalog.len(),
            locations.len()
        );
        Ok(Self {
            storage,
            tags,
            catalog,
            locations,
        })
    }

    /// The item catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The known locations.
    #[must_use]
    pub fn locations(&self) -> &LocationSet {
        &self.locations
    }

    /// The storage backing this session.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The tag generator.
    #[must_use]
    pub fn tags(&self) -> &TagGenerator {
        &self.tags
    }

    /// Find an item by name, ignoring case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        self.catalog.find_by_name(name)
    }

    /// Items whose name contains `needle`, ignoring case.
    #[must_use]
    pub fn search_by_name(&self, needle: &str) -> Vec<&Item> {
        self.catalog.search_by_name(needle)
    }

    /// Add a location and save the list.
    ///
    /// Returns `false` without writing if the name is empty or already known.
    ///
    /// # Errors
    ///
    /// Returns an error if the locations file cannot be written.
    pub fn add_location(&mut self, name: &str) -> Result<bool> {
        if !self.locations.add(name) {
            debug!("Location '{}' not added", name);
            return Ok(false);
        }
        self.storage.save_locations(&self.locations)?;
        info!("Added location '{}'", name);
        Ok(true)
    }

    /// Delete a location and save the list.
    ///
    /// Items stored at that location keep it. Returns `false` without writing
    /// if the location is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the locations file cannot be written.
    pub fn delete_location(&mut self, name: &str) -> Result<bool> {
        if !self.locations.remove(name) {
            return Ok(false);
        }
        self.storage.save_locations(&self.locations)?;
        info!("Deleted location '{}'", name);
        Ok(true)
    }

    /// Create or update an item from the entry form, then save the records.
    ///
    /// A form whose name matches an existing item (ignoring case) replaces
    /// that item's location, price and notes; its name, tag and photo stay.
    /// Otherwise a new item is created with a fresh name tag and, if given,
    /// a copy of the photo.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without touching any file, if the name or
    /// location is empty, the location is unknown, the price is negative, or
    /// a photo for a new item is missing or of the wrong type. Returns other
    /// errors if generating the tag or writing the records fails.
    pub fn save_item(&mut self, form: ItemForm) -> Result<SaveOutcome> {
        self.validate(&form)?;

        if let Some(item) = self.catalog.find_by_name_mut(&form.name) {
            item.location = form.location;
            item.price = form.price;
            item.misc = form.misc;
            if form.photo.is_some() {
                warn!("Photo ignored: '{}' already exists", item.name);
            }
            let updated = item.clone();
            self.storage.save_records(self.catalog.items())?;
            info!("Updated item '{}'", updated.name);
            return Ok(SaveOutcome::Updated(updated));
        }

        let barcode_img = self.tags.generate_name_tag(&form.name)?;
        let picture_path = form
            .photo
            .as_deref()
            .map(|photo| self.tags.store_upload(&form.name, photo))
            .transpose()?;

        let item = Item {
            name: form.name,
            location: form.location,
            price: form.price,
            misc: form.misc,
            barcode_img,
            picture_path,
        };
        self.catalog.insert(item.clone());
        self.storage.save_records(self.catalog.items())?;
        info!("Created item '{}'", item.name);
        Ok(SaveOutcome::Created(item))
    }

    /// Run one menu action against the item called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ItemNotFound`] if no item matches,
    /// [`Error::PhotoMissing`] for a photo request on an item without one, and
    /// I/O or image errors from generating files.
    pub fn run_action(&mut self, action: ItemAction, name: &str) -> Result<ActionOutcome> {
        let item = self
            .catalog
            .find_by_name(name)
            .ok_or_else(|| Error::item_not_found(name))?;
        debug!("Running '{}' for '{}'", action, item.name);

        let outcome = match action {
            ItemAction::GenerateDataTag => ActionOutcome::Image {
                path: self.tags.generate_data_tag(item)?,
                caption: "Data QR Code",
            },
            ItemAction::GenerateNameImage => ActionOutcome::Image {
                path: self.tags.generate_name_image(&item.name)?,
                caption: "Name-Based Generated Image",
            },
            ItemAction::FindLocation => ActionOutcome::Location {
                location: item.location.clone(),
            },
            ItemAction::PrintTag => ActionOutcome::Image {
                path: item.barcode_img.clone(),
                caption: "Print: QR Code",
            },
            ItemAction::PrintPhoto => match item.existing_photo() {
                Some(path) => ActionOutcome::Image {
                    path: path.to_path_buf(),
                    caption: "Print: Photo",
                },
                None => return Err(Error::photo_missing(&item.name)),
            },
            ItemAction::PrintData => ActionOutcome::Data {
                details: item.details(),
            },
            ItemAction::SaveNameImage => ActionOutcome::Saved {
                what: "name photo",
                path: self.tags.generate_name_image(&item.name)?,
            },
            ItemAction::SaveNameTag => ActionOutcome::Saved {
                what: "name QR",
                path: self.tags.save_name_qr(&item.name)?,
            },
            ItemAction::SaveLocation => {
                let location = item.location.clone();
                if location.is_empty() {
                    ActionOutcome::NoLocation {
                        name: item.name.clone(),
                    }
                } else if self.locations.add(&location) {
                    self.storage.save_locations(&self.locations)?;
                    info!("Added location '{}' from item '{}'", location, item.name);
                    ActionOutcome::LocationAdded { location }
                } else {
                    ActionOutcome::LocationExists { location }
                }
            }
        };
        Ok(outcome)
    }

    /// Counts and paths for status output.
    #[must_use]
    pub fn stats(&self) -> InventoryStats {
        InventoryStats {
            items: self.catalog.len(),
            locations: self.locations.len(),
            photos: self
                .catalog
                .items()
                .iter()
                .filter(|item| item.existing_photo().is_some())
                .count(),
            records_path: self.storage.records_path().to_path_buf(),
            locations_path: self.storage.locations_path().to_path_buf(),
            items_dir: self.tags.items_dir().to_path_buf(),
        }
    }

    fn validate(&self, form: &ItemForm) -> Result<()> {
        if form.name.is_empty() {
            return Err(Error::MissingName);
        }
        if form.location.is_empty() {
            return Err(Error::MissingLocation);
        }
        if !self.locations.contains(&form.location) {
            return Err(Error::UnknownLocation {
                location: form.location.clone(),
            });
        }
        if !form.price.is_finite() || form.price < 0.0 {
            return Err(Error::InvalidPrice { price: form.price });
        }
        if let Some(photo) = &form.photo {
            if self.catalog.find_by_name(&form.name).is_none() {
                tags::check_upload(photo)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagKind;

    fn create_test_session(dir: &std::path::Path) -> Session {
        crate::logging::init_test_logging();
        let mut session = Session::open(&Config::rooted_at(dir)).unwrap();
        session.add_location("Garage").unwrap();
        session.add_location("Shed").unwrap();
        session
    }

    #[test]
    fn test_open_creates_items_dir() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(&Config::rooted_at(dir.path())).unwrap();

        assert!(dir.path().join("Items").is_dir());
        assert!(session.catalog().is_empty());
        assert!(session.locations().is_empty());
    }

    #[test]
    fn test_save_new_item() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());

        let outcome = session
            .save_item(ItemForm::new("Hammer", "Garage").price(12.5))
            .unwrap();
        assert!(outcome.is_created());
        assert_eq!(outcome.to_string(), "Saved new item: 'Hammer'");
        assert_eq!(session.catalog().len(), 1);

        let tag = session.tags().path_for("Hammer", TagKind::NameTag);
        assert_eq!(outcome.item().barcode_img, tag);
        assert!(tag.exists());
        assert!(session.storage().records_path().exists());
    }

    #[test]
    fn test_save_existing_item_updates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());
        session
            .save_item(ItemForm::new("Hammer", "Garage").price(12.5).misc("claw"))
            .unwrap();

        let outcome = session
            .save_item(ItemForm::new("HAMMER", "Shed").price(15.0).misc("new"))
            .unwrap();
        assert!(!outcome.is_created());
        assert_eq!(outcome.to_string(), "Updated existing item: 'Hammer'");
        assert_eq!(session.catalog().len(), 1);

        let item = session.find_by_name("hammer").unwrap();
        assert_eq!(item.name, "Hammer");
        assert_eq!(item.location, "Shed");
        assert_eq!(item.misc, "new");
        assert!((item.price - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_ignores_photo() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());
        session.save_item(ItemForm::new("Hammer", "Garage")).unwrap();

        // Not validated either: the upload is never used on update
        let outcome = session
            .save_item(ItemForm::new("Hammer", "Garage").photo("/nonexistent/a.gif"))
            .unwrap();
        assert!(outcome.item().picture_path.is_none());
    }

    #[test]
    fn test_new_item_with_photo() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());
        let photo = dir.path().join("upload.jpg");
        std::fs::write(&photo, b"jpg").unwrap();

        let outcome = session
            .save_item(ItemForm::new("Drill", "Shed").photo(&photo))
            .unwrap();
        let stored = outcome.item().picture_path.clone().unwrap();
        assert_eq!(stored, session.tags().upload_path("Drill", "jpg"));
        assert!(stored.exists());
    }

    #[test]
    fn test_validation_errors_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());
        let records = session.storage().records_path().to_path_buf();

        let cases = [
            (ItemForm::new("", "Garage"), "MissingName"),
            (ItemForm::new("Hammer", ""), "MissingLocation"),
            (ItemForm::new("Hammer", "Attic"), "UnknownLocation"),
            (ItemForm::new("Hammer", "Garage").price(-1.0), "InvalidPrice"),
            (ItemForm::new("Hammer", "Garage").price(f64::NAN), "InvalidPrice"),
            (
                ItemForm::new("Hammer", "Garage").photo("/tmp/photo.bmp"),
                "UnsupportedUpload",
            ),
            (
                ItemForm::new("Hammer", "Garage").photo("/nonexistent/photo.png"),
                "UploadMissing",
            ),
        ];
        for (form, expected) in cases {
            let err = session.save_item(form).unwrap_err();
            assert!(err.is_validation_error(), "{err:?}");
            assert!(format!("{err:?}").starts_with(expected), "{err:?}");
        }

        assert!(session.catalog().is_empty());
        assert!(!records.exists());
        assert_eq!(
            std::fs::read_dir(session.tags().items_dir()).unwrap().count(),
            0
        );
    }

    #[test]
    fn test_name_checked_before_location() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());

        let err = session.save_item(ItemForm::new("", "")).unwrap_err();
        assert!(matches!(err, Error::MissingName));
    }

    #[test]
    fn test_add_location_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());

        assert!(session.add_location("Attic").unwrap());
        assert!(!session.add_location("Attic").unwrap());
        assert!(!session.add_location("").unwrap());

        let reloaded = session.storage().load_locations().unwrap();
        let names: Vec<_> = reloaded.iter().collect();
        assert_eq!(names, ["Garage", "Shed", "Attic"]);
    }

    #[test]
    fn test_delete_location_keeps_items() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());
        session.save_item(ItemForm::new("Hammer", "Garage")).unwrap();

        assert!(session.delete_location("Garage").unwrap());
        assert!(!session.delete_location("Garage").unwrap());
        assert!(!session.locations().contains("Garage"));
        assert_eq!(session.find_by_name("Hammer").unwrap().location, "Garage");
    }

    #[test]
    fn test_action_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());

        for action in ItemAction::ALL {
            let err = session.run_action(action, "Wrench").unwrap_err();
            assert!(err.is_not_found());
        }
        assert_eq!(
            std::fs::read_dir(session.tags().items_dir()).unwrap().count(),
            0
        );
    }

    #[test]
    fn test_action_find_location() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());
        session.save_item(ItemForm::new("Hammer", "Garage")).unwrap();

        let outcome = session.run_action(ItemAction::FindLocation, "hammer").unwrap();
        assert_eq!(outcome.to_string(), "Item location: Garage");
    }

    #[test]
    fn test_action_generate_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());
        session.save_item(ItemForm::new("Hammer", "Garage")).unwrap();

        let expectations = [
            (ItemAction::GenerateDataTag, TagKind::DataTag),
            (ItemAction::GenerateNameImage, TagKind::NameImage),
            (ItemAction::SaveNameImage, TagKind::NameImage),
            (ItemAction::SaveNameTag, TagKind::NameQr),
        ];
        for (action, kind) in expectations {
            let outcome = session.run_action(action, "Hammer").unwrap();
            let path = match outcome {
                ActionOutcome::Image { path, .. } | ActionOutcome::Saved { path, .. } => path,
                other => panic!("unexpected outcome {other:?}"),
            };
            assert_eq!(path, session.tags().path_for("Hammer", kind));
            assert!(path.exists());
        }
    }

    #[test]
    fn test_action_print_tag_and_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());
        session
            .save_item(ItemForm::new("Hammer", "Garage").price(3.0).misc("claw"))
            .unwrap();

        let outcome = session.run_action(ItemAction::PrintTag, "Hammer").unwrap();
        assert!(matches!(outcome, ActionOutcome::Image { caption: "Print: QR Code", .. }));

        let outcome = session.run_action(ItemAction::PrintData, "Hammer").unwrap();
        match outcome {
            ActionOutcome::Data { details } => {
                assert_eq!(details.name, "Hammer");
                assert_eq!(details.misc, "claw");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_action_print_photo() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());
        let photo = dir.path().join("upload.png");
        std::fs::write(&photo, b"png").unwrap();
        session.save_item(ItemForm::new("Hammer", "Garage")).unwrap();
        let stored = session
            .save_item(ItemForm::new("Drill", "Garage").photo(&photo))
            .unwrap()
            .item()
            .picture_path
            .clone()
            .unwrap();

        let err = session.run_action(ItemAction::PrintPhoto, "Hammer").unwrap_err();
        assert!(matches!(err, Error::PhotoMissing { .. }));

        let outcome = session.run_action(ItemAction::PrintPhoto, "Drill").unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Image {
                path: stored.clone(),
                caption: "Print: Photo"
            }
        );

        std::fs::remove_file(&stored).unwrap();
        let err = session.run_action(ItemAction::PrintPhoto, "Drill").unwrap_err();
        assert!(matches!(err, Error::PhotoMissing { .. }));
    }

    #[test]
    fn test_action_save_location() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());
        session.save_item(ItemForm::new("Hammer", "Garage")).unwrap();

        let outcome = session.run_action(ItemAction::SaveLocation, "Hammer").unwrap();
        assert!(matches!(outcome, ActionOutcome::LocationExists { .. }));

        session.delete_location("Garage").unwrap();
        let outcome = session.run_action(ItemAction::SaveLocation, "Hammer").unwrap();
        assert_eq!(outcome.to_string(), "Added 'Garage' to location list.");
        assert!(session
            .storage()
            .load_locations()
            .unwrap()
            .contains("Garage"));
    }

    #[test]
    fn test_action_save_location_without_location() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("data.json"),
            r#"[{"name":"Hammer","location":"","price":1.0,"misc":"",
                "barcode_img":"Items/Hammer_barcode.png","picture_path":""}]"#,
        )
        .unwrap();
        let mut session = create_test_session(dir.path());
        let before = session.locations().len();

        let outcome = session.run_action(ItemAction::SaveLocation, "hammer").unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::NoLocation {
                name: "Hammer".to_string()
            }
        );
        assert_eq!(session.locations().len(), before);
        assert!(!session.locations().contains(""));
    }

    #[test]
    fn test_stats() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = create_test_session(dir.path());
        session.save_item(ItemForm::new("Hammer", "Garage")).unwrap();

        let stats = session.stats();
        assert_eq!(stats.items, 1);
        assert_eq!(stats.locations, 2);
        assert_eq!(stats.photos, 0);
        assert_eq!(stats.items_dir, dir.path().join("Items"));
    }

    #[test]
    fn test_reopen_sees_saved_state() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut session = create_test_session(dir.path());
            session
                .save_item(ItemForm::new("Hammer", "Garage").price(12.5))
                .unwrap();
        }

        let session = Session::open(&Config::rooted_at(dir.path())).unwrap();
        assert_eq!(session.catalog().len(), 1);
        assert_eq!(session.locations().len(), 2);
        assert_eq!(session.find_by_name("hammer").unwrap().location, "Garage");
    }
}
