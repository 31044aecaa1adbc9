//! I/O utilities for persistence operations.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Classifies I/O errors into specific StorageError variants.
pub fn classify_io_error(error: std::io::Error, context: &str) -> StorageError {
    match error.kind() {
        ErrorKind::StorageFull | ErrorKind::OutOfMemory => {
            StorageError::DiskFull(format!("{}: {}", context, error))
        }
        ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
            StorageError::Corrupt(format!("{}: {}", context, error))
        }
        _ => StorageError::Io(format!("{}: {}", context, error)),
    }
}

/// Classifies CSV reader/writer errors; anything but I/O means a malformed file.
pub fn classify_csv_error(error: csv::Error, context: &str) -> StorageError {
    let message = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(io) => classify_io_error(io, context),
        _ => StorageError::Corrupt(format!("{}: {}", context, message)),
    }
}

/// Path of the sibling temporary file used while saving `path`.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replaces the file at `path` with `contents` all-or-nothing.
///
/// Writes a sibling temporary file, syncs it, then renames it over the
/// target. On any failure the temporary file is removed and the previous
/// content of `path` is untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| classify_io_error(e, "Failed to create data directory"))?;
    }

    let temp_path = temp_path_for(path);
    let result = write_and_sync(&temp_path, contents).and_then(|()| {
        fs::rename(&temp_path, path)
            .map_err(|e| classify_io_error(e, "Failed to rename data file"))
    });

    if result.is_err() {
        if let Err(e) = fs::remove_file(&temp_path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to remove temp file {}: {}",
                    temp_path.display(),
                    e
                );
            }
        }
    }
    result
}

fn write_and_sync(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let mut file =
        File::create(path).map_err(|e| classify_io_error(e, "Failed to create temp file"))?;
    file.write_all(contents)
        .map_err(|e| classify_io_error(e, "Failed to write data"))?;
    file.sync_all()
        .map_err(|e| classify_io_error(e, "Failed to sync data"))?;
    Ok(())
}
