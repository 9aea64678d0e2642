//! Error types for mode operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mode operations
pub type ModeResult<T> = Result<T, ModeError>;

/// Failures reading or writing a JSON document
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but is not a JSON document
    #[error("JSON parse error in {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    /// Any other I/O failure (permissions, full disk, ...)
    #[error("I/O error for {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl StorageError {
    /// Missing and malformed documents both mean "no data" to most callers
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Malformed { .. })
    }

    pub(crate) fn io(path: &std::path::Path, err: &impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Errors that can occur during mode operations
#[derive(Debug, Error)]
pub enum ModeError {
    /// Requested mode is not in the catalog
    #[error("Unknown mode '{name}'. Available modes: {}", available_list(.available))]
    UnknownMode { name: String, available: Vec<String> },

    /// Mode is cataloged but has no backing config file
    #[error("Config file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    /// Mode config file vanished or stopped parsing before it could be used
    #[error("Could not read config file: {}", .0.display())]
    ConfigUnreadable(PathBuf),

    /// The live configuration could not be loaded
    #[error("Could not read current config")]
    LiveConfigUnreadable,

    /// Mode name is empty after normalization
    #[error("Mode name cannot be empty")]
    EmptyName,

    /// Mode name collides with the manifest stem
    #[error("'{0}' is a reserved name")]
    ReservedName(String),

    /// Mode name is not usable as a file name
    #[error("Invalid mode name: {0}")]
    InvalidName(String),

    /// Capture target already exists
    #[error("Mode '{0}' already exists. Choose a different name.")]
    DuplicateMode(String),

    /// A primary write failed
    #[error("Failed to write {}: {message}", path.display())]
    WriteFailed { path: PathBuf, message: String },

    /// Unexpected failure after the switch started executing
    #[error("Failed to switch mode: {0}")]
    SwitchFailed(String),
}

impl ModeError {
    /// Get the error code for CLI/API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownMode { .. } => "UNKNOWN_MODE",
            Self::ConfigMissing(_) | Self::LiveConfigUnreadable => "NOT_FOUND",
            Self::ConfigUnreadable(_) => "PARSE_ERROR",
            Self::EmptyName | Self::ReservedName(_) | Self::InvalidName(_) => "VALIDATION_ERROR",
            Self::DuplicateMode(_) => "CONFLICT",
            Self::WriteFailed { .. } => "IO_ERROR",
            Self::SwitchFailed(_) => "SWITCH_FAILED",
        }
    }
}

fn available_list(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}

impl From<StorageError> for ModeError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io { path, message } => Self::WriteFailed { path, message },
            StorageError::NotFound(path) | StorageError::Malformed { path, .. } => {
                Self::ConfigUnreadable(path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_mode_lists_available() {
        let err = ModeError::UnknownMode {
            name: "nope".into(),
            available: vec!["full".into(), "minimal".into()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown mode 'nope'. Available modes: full, minimal"
        );
        assert_eq!(err.code(), "UNKNOWN_MODE");
    }

    #[test]
    fn test_unknown_mode_with_empty_catalog() {
        let err = ModeError::UnknownMode {
            name: "x".into(),
            available: Vec::new(),
        };
        assert!(err.to_string().ends_with("Available modes: none"));
    }

    #[test]
    fn test_no_data_classification() {
        assert!(StorageError::NotFound(PathBuf::from("a")).is_no_data());
        assert!(StorageError::Malformed {
            path: PathBuf::from("a"),
            message: "eof".into()
        }
        .is_no_data());
        assert!(!StorageError::Io {
            path: PathBuf::from("a"),
            message: "denied".into()
        }
        .is_no_data());
    }
}
