//! Tag and image generation.
//!
//! Every generated file lives in the items directory under a name derived
//! from the item name plus a fixed suffix per [`TagKind`]. Generating again
//! for the same name overwrites the previous file.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Luma, Rgb, RgbImage};
use qrcode::QrCode;
use tracing::{debug, info};

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::item::Item;

/// Photo extensions accepted for upload, compared case-insensitively.
const UPLOAD_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Width and height of one unscaled glyph.
const GLYPH_SIZE: u32 = 8;

/// The kinds of generated image, each with its own file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// QR code of the name, made when an item is first saved.
    NameTag,
    /// QR code of the name, made on request from the action menu.
    NameQr,
    /// QR code of the full item summary.
    DataTag,
    /// The name drawn as plain text.
    NameImage,
}

impl TagKind {
    /// File name suffix for this kind.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::NameTag => "_barcode.png",
            Self::NameQr => "_nameqr.png",
            Self::DataTag => "_dataqr.png",
            Self::NameImage => "_genpic.png",
        }
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameTag => write!(f, "name tag"),
            Self::NameQr => write!(f, "name QR"),
            Self::DataTag => write!(f, "data tag"),
            Self::NameImage => write!(f, "name image"),
        }
    }
}

/// Writes QR tags, name images and uploaded photos into the items directory.
#[derive(Debug, Clone)]
pub struct TagGenerator {
    items_dir: PathBuf,
    render: RenderConfig,
}

impl TagGenerator {
    /// Create a generator writing into `items_dir`.
    #[must_use]
    pub fn new(items_dir: impl Into<PathBuf>, render: RenderConfig) -> Self {
        Self {
            items_dir: items_dir.into(),
            render,
        }
    }

    /// Get the items directory.
    #[must_use]
    pub fn items_dir(&self) -> &Path {
        &self.items_dir
    }

    /// Create the items directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_items_dir(&self) -> Result<()> {
        if !self.items_dir.exists() {
            fs::create_dir_all(&self.items_dir).map_err(|source| Error::DirectoryCreate {
                path: self.items_dir.clone(),
                source,
            })?;
            info!("Created items directory {}", self.items_dir.display());
        }
        Ok(())
    }

    /// Path of the generated file of `kind` for the item called `name`.
    #[must_use]
    pub fn path_for(&self, name: &str, kind: TagKind) -> PathBuf {
        self.items_dir
            .join(format!("{}{}", file_stem(name), kind.suffix()))
    }

    /// Path an uploaded photo with `extension` is stored under.
    #[must_use]
    pub fn upload_path(&self, name: &str, extension: &str) -> PathBuf {
        self.items_dir
            .join(format!("{}_pic.{extension}", file_stem(name)))
    }

    /// Write the QR name tag made when an item is created.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing the image fails.
    pub fn generate_name_tag(&self, name: &str) -> Result<PathBuf> {
        self.write_qr(name, name, TagKind::NameTag)
    }

    /// Write the QR name tag requested from the action menu.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing the image fails.
    pub fn save_name_qr(&self, name: &str) -> Result<PathBuf> {
        self.write_qr(name, name, TagKind::NameQr)
    }

    /// Write a QR tag holding the full item summary.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing the image fails.
    pub fn generate_data_tag(&self, item: &Item) -> Result<PathBuf> {
        self.write_qr(&item.name, &item.data_summary(), TagKind::DataTag)
    }

    /// Draw the name as text on a blank canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the image fails.
    pub fn generate_name_image(&self, name: &str) -> Result<PathBuf> {
        let render = &self.render;
        let mut canvas = RgbImage::from_pixel(
            render.canvas_width,
            render.canvas_height,
            Rgb([255, 255, 255]),
        );
        draw_text(
            &mut canvas,
            name,
            render.text_x,
            render.text_y,
            render.text_scale,
        );

        let path = self.path_for(name, TagKind::NameImage);
        canvas.save(&path)?;
        debug!("Wrote {} to {}", TagKind::NameImage, path.display());
        Ok(path)
    }

    /// Copy an uploaded photo into the items directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected by [`check_upload`] or the
    /// copy fails.
    pub fn store_upload(&self, name: &str, source: &Path) -> Result<PathBuf> {
        let extension = check_upload(source)?;
        let path = self.upload_path(name, extension);
        fs::copy(source, &path)?;
        debug!("Stored photo {} as {}", source.display(), path.display());
        Ok(path)
    }

    fn write_qr(&self, name: &str, content: &str, kind: TagKind) -> Result<PathBuf> {
        let code = QrCode::new(content.as_bytes())?;
        let size = self.render.qr_module_size;
        let image = code
            .render::<Luma<u8>>()
            .quiet_zone(self.render.qr_quiet_zone)
            .module_dimensions(size, size)
            .build();

        let path = self.path_for(name, kind);
        image.save(&path)?;
        debug!("Wrote {kind} to {}", path.display());
        Ok(path)
    }
}

/// Check that `source` exists and has an accepted photo extension.
///
/// Returns the extension as written in the file name.
///
/// # Errors
///
/// Returns [`Error::UnsupportedUpload`] or [`Error::UploadMissing`].
pub fn check_upload(source: &Path) -> Result<&str> {
    let extension = source
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or_default();
    if !UPLOAD_EXTENSIONS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    {
        return Err(Error::UnsupportedUpload {
            extension: extension.to_string(),
        });
    }
    if !source.is_file() {
        return Err(Error::UploadMissing {
            path: source.to_path_buf(),
        });
    }
    Ok(extension)
}

/// File name stem for an item; path separators become underscores.
fn file_stem(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// Draw `text` in black with its top-left corner at (`x`, `y`), clipping at
/// the canvas edges.
fn draw_text(canvas: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32) {
    let (width, height) = canvas.dimensions();
    let advance = GLYPH_SIZE.saturating_mul(scale);
    let mut pen_x = x;

    for ch in text.chars() {
        if pen_x >= width {
            break;
        }
        let glyph = glyph_for(ch);
        for (row, bits) in (0u32..).zip(glyph) {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let left = pen_x.saturating_add(col.saturating_mul(scale));
                let top = y.saturating_add(row.saturating_mul(scale));
                for py in top..top.saturating_add(scale).min(height) {
                    for px in left..left.saturating_add(scale).min(width) {
                        canvas.put_pixel(px, py, Rgb([0, 0, 0]));
                    }
                }
            }
        }
        pen_x = pen_x.saturating_add(advance);
    }
}

/// Bitmap for `ch`, one byte per row with bit 0 as the leftmost pixel.
fn glyph_for(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_generator(dir: &Path) -> TagGenerator {
        let generator = TagGenerator::new(dir.join("Items"), RenderConfig::default());
        generator.ensure_items_dir().unwrap();
        generator
    }

    fn test_item() -> Item {
        Item {
            name: "Hammer".to_string(),
            location: "Garage".to_string(),
            price: 12.5,
            misc: "claw".to_string(),
            barcode_img: PathBuf::from("Items/Hammer_barcode.png"),
            picture_path: None,
        }
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(TagKind::NameTag.suffix(), "_barcode.png");
        assert_eq!(TagKind::NameQr.suffix(), "_nameqr.png");
        assert_eq!(TagKind::DataTag.suffix(), "_dataqr.png");
        assert_eq!(TagKind::NameImage.suffix(), "_genpic.png");
    }

    #[test]
    fn test_path_for_is_deterministic() {
        let generator = TagGenerator::new("/srv/Items", RenderConfig::default());
        assert_eq!(
            generator.path_for("Hammer", TagKind::NameTag),
            PathBuf::from("/srv/Items/Hammer_barcode.png")
        );
        assert_eq!(
            generator.path_for("Hammer", TagKind::NameTag),
            generator.path_for("Hammer", TagKind::NameTag)
        );
        assert_ne!(
            generator.path_for("Hammer", TagKind::NameTag),
            generator.path_for("Hammer", TagKind::NameQr)
        );
    }

    #[test]
    fn test_path_for_replaces_separators() {
        let generator = TagGenerator::new("/srv/Items", RenderConfig::default());
        assert_eq!(
            generator.path_for("../etc/passwd", TagKind::DataTag),
            PathBuf::from("/srv/Items/.._etc_passwd_dataqr.png")
        );
    }

    #[test]
    fn test_upload_path_keeps_extension() {
        let generator = TagGenerator::new("/srv/Items", RenderConfig::default());
        assert_eq!(
            generator.upload_path("Hammer", "JPG"),
            PathBuf::from("/srv/Items/Hammer_pic.JPG")
        );
    }

    #[test]
    fn test_generate_name_tag_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let generator = create_test_generator(dir.path());

        let path = generator.generate_name_tag("Hammer").unwrap();
        assert_eq!(path, generator.path_for("Hammer", TagKind::NameTag));

        let image = image::open(&path).unwrap();
        assert_eq!(image.width(), image.height());
        // 21 modules plus 4 quiet modules per side, 10 px each
        assert_eq!(image.width(), (21 + 8) * 10);
    }

    #[test]
    fn test_save_name_qr_uses_own_path() {
        let dir = tempfile::tempdir().unwrap();
        let generator = create_test_generator(dir.path());

        let tag = generator.generate_name_tag("Hammer").unwrap();
        let qr = generator.save_name_qr("Hammer").unwrap();
        assert_ne!(tag, qr);
        assert!(tag.exists());
        assert!(qr.ends_with("Hammer_nameqr.png"));
    }

    #[test]
    fn test_data_tag_is_larger_than_name_tag() {
        let dir = tempfile::tempdir().unwrap();
        let generator = create_test_generator(dir.path());

        let name = image::open(generator.generate_name_tag("Hammer").unwrap()).unwrap();
        let data = image::open(generator.generate_data_tag(&test_item()).unwrap()).unwrap();
        assert!(data.width() > name.width());
    }

    #[test]
    fn test_regenerate_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let generator = create_test_generator(dir.path());
        let mut item = test_item();

        let first = generator.generate_data_tag(&item).unwrap();
        let before = fs::read(&first).unwrap();

        item.misc = "claw, steel handle, bought at the hardware store".to_string();
        let second = generator.generate_data_tag(&item).unwrap();
        assert_eq!(first, second);
        assert_ne!(before, fs::read(&second).unwrap());
        assert_eq!(fs::read_dir(generator.items_dir()).unwrap().count(), 1);
    }

    #[test]
    fn test_name_image_has_canvas_size_and_ink() {
        let dir = tempfile::tempdir().unwrap();
        let generator = create_test_generator(dir.path());

        let path = generator.generate_name_image("Hammer").unwrap();
        assert!(path.ends_with("Hammer_genpic.png"));

        let image = image::open(&path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (300, 100));
        assert!(image.pixels().any(|p| *p == Rgb([0, 0, 0])));
        // Above the text origin stays blank
        assert_eq!(*image.get_pixel(5, 5), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_draw_text_clips_long_names() {
        let mut canvas = RgbImage::from_pixel(40, 20, Rgb([255, 255, 255]));
        draw_text(&mut canvas, &"W".repeat(50), 10, 15, 2);
        assert_eq!(canvas.dimensions(), (40, 20));
    }

    #[test]
    fn test_draw_text_huge_scale_clips() {
        let mut canvas = RgbImage::from_pixel(40, 20, Rgb([255, 255, 255]));
        draw_text(&mut canvas, "Hammer", 10, 15, 600_000_000);
        assert_eq!(canvas.dimensions(), (40, 20));
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_draw_text_empty_leaves_canvas_blank() {
        let mut canvas = RgbImage::from_pixel(40, 20, Rgb([255, 255, 255]));
        draw_text(&mut canvas, "", 0, 0, 1);
        assert!(canvas.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_glyph_fallback() {
        assert_ne!(glyph_for('A'), [0; 8]);
        assert_eq!(glyph_for(' '), [0; 8]);
        assert_eq!(glyph_for('\u{1F528}'), glyph_for('?'));
    }

    #[test]
    fn test_store_upload() {
        let dir = tempfile::tempdir().unwrap();
        let generator = create_test_generator(dir.path());
        let source = dir.path().join("photo.jpeg");
        fs::write(&source, b"jpeg bytes").unwrap();

        let stored = generator.store_upload("Hammer", &source).unwrap();
        assert_eq!(stored, generator.items_dir().join("Hammer_pic.jpeg"));
        assert_eq!(fs::read(stored).unwrap(), b"jpeg bytes");
    }

    #[test]
    fn test_check_upload_rejects_extension() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.gif");
        fs::write(&source, b"gif").unwrap();

        let err = check_upload(&source).unwrap_err();
        assert!(matches!(err, Error::UnsupportedUpload { ref extension } if extension == "gif"));
    }

    #[test]
    fn test_check_upload_rejects_missing_file() {
        let err = check_upload(Path::new("/nonexistent/photo.png")).unwrap_err();
        assert!(matches!(err, Error::UploadMissing { .. }));
    }

    #[test]
    fn test_check_upload_accepts_uppercase() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.PNG");
        fs::write(&source, b"png").unwrap();
        assert_eq!(check_upload(&source).unwrap(), "PNG");
    }

    #[test]
    fn test_ensure_items_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let generator = TagGenerator::new(dir.path().join("a/b/Items"), RenderConfig::default());
        generator.ensure_items_dir().unwrap();
        assert!(generator.items_dir().is_dir());
    }
}
