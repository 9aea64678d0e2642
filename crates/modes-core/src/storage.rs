//! JSON document storage
//!
//! Every file this crate touches goes through here. Reads report *why* a
//! document is unavailable via [`StorageError`]; callers that only care
//! whether there is data use [`load_optional`].

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::StorageError;

/// Read a file's raw bytes
///
/// # Errors
/// Returns `NotFound` for a missing file and `Io` for any other read failure
pub fn read_raw(path: &Path) -> Result<Vec<u8>, StorageError> {
    fs::read(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            StorageError::NotFound(path.to_path_buf())
        } else {
            StorageError::io(path, &e)
        }
    })
}

/// Parse bytes previously read from `path`
///
/// # Errors
/// Returns `Malformed` if the bytes are not a JSON document
pub fn parse(path: &Path, bytes: &[u8]) -> Result<Value, StorageError> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a JSON document
///
/// # Errors
/// Returns an error if the file is missing, unreadable or not valid JSON
pub fn load(path: &Path) -> Result<Value, StorageError> {
    let bytes = read_raw(path)?;
    parse(path, &bytes)
}

/// Load a JSON document, treating every failure as "no data"
#[must_use]
pub fn load_optional(path: &Path) -> Option<Value> {
    match load(path) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no document");
            None
        }
    }
}

/// Save a JSON document with 2-space indentation
///
/// Parent directories are created as needed.
///
/// # Errors
/// Returns `Io` if the directory or file cannot be written
pub fn save(path: &Path, document: &Value) -> Result<(), StorageError> {
    let content = serde_json::to_vec_pretty(document).map_err(|e| StorageError::io(path, &e))?;
    write_atomic(path, &content)
}

/// Replace `path` with `bytes` via a sibling temp file and a rename
///
/// Readers racing the write see either the old or the new file, never a
/// truncated one. An existing destination is resolved through symlinks and
/// keeps its permissions.
///
/// # Errors
/// Returns `Io` if any step fails; the destination is left untouched then
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let (target, permissions) = match fs::canonicalize(path) {
        Ok(resolved) => {
            let meta = fs::metadata(&resolved).map_err(|e| StorageError::io(&resolved, &e))?;
            (resolved, Some(meta.permissions()))
        }
        Err(_) => (path.to_path_buf(), None),
    };

    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, &e))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| StorageError::io(parent, &e))?;
    tmp.write_all(bytes).map_err(|e| StorageError::io(path, &e))?;
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| StorageError::io(path, &e))?;
    }
    tmp.as_file().sync_all().map_err(|e| StorageError::io(path, &e))?;
    tmp.persist(&target)
        .map_err(|e| StorageError::io(path, &e.error))?;
    Ok(())
}
