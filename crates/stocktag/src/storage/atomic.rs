//! Crash-safe whole-file writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{Error, Result};

/// Replace the contents of `path` with `data`.
///
/// The bytes are written to a sibling `.tmp` file, synced, and renamed over
/// `path`, so readers see either the old or the new contents in full. Missing
/// parent directories are created.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the
/// temporary file cannot be written or renamed.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let temp_path = temp_path_for(path);
    let written = write_synced(&temp_path, data).and_then(|()| fs::rename(&temp_path, path));
    if let Err(source) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::FileWrite {
            path: path.to_path_buf(),
            source,
        });
    }

    trace!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

/// Write `data` to a fresh file at `path` and flush it to disk.
fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

/// The temporary sibling used while replacing `path`.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
