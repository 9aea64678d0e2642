//! Name validation for anything that becomes a file name

use thiserror::Error;

/// Reasons a name cannot be used as a profile file stem
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NameError {
    #[error("Empty name")]
    Empty,

    #[error("Name contains path separator: {0}")]
    PathSeparator(String),

    #[error("Name contains parent directory reference: {0}")]
    ParentReference(String),

    #[error("Name cannot start with dot: {0}")]
    Hidden(String),

    #[error("Name contains null byte")]
    NullByte,
}

/// Validate a mode name for use in paths
/// Names must not contain path separators or .. sequences
///
/// # Errors
/// Returns an error if the name is invalid
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }

    if name.contains('/') || name.contains('\\') {
        return Err(NameError::PathSeparator(name.to_string()));
    }

    if name.contains("..") {
        return Err(NameError::ParentReference(name.to_string()));
    }

    if name.starts_with('.') {
        return Err(NameError::Hidden(name.to_string()));
    }

    if name.contains('\0') {
        return Err(NameError::NullByte);
    }

    Ok(())
}
