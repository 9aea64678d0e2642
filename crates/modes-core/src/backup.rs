//! Timestamped backups of the live config
//!
//! Backups are written to `config.<YYYY-MM-DD-HHMMSS>.json` and never pruned.
//! Names sort lexically in chronological order.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::StorageError;
use crate::paths::ModePaths;
use crate::storage;

/// How many backups a listing shows
pub const LISTING_LIMIT: usize = 10;

const PREFIX: &str = "config.";
const SUFFIX: &str = ".json";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H%M%S";

/// Most recent backups plus how many older ones were left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupListing {
    /// Store location
    pub dir: PathBuf,
    /// Newest first, at most [`LISTING_LIMIT`]
    pub recent: Vec<String>,
    /// Backups older than the ones in `recent`
    pub older: usize,
}

impl BackupListing {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.recent.len() + self.older
    }
}

/// Snapshots the live config into the backup store
pub struct BackupManager {
    live_config: PathBuf,
    backups_dir: PathBuf,
}

impl BackupManager {
    #[must_use]
    pub fn new(paths: &ModePaths) -> Self {
        Self {
            live_config: paths.live_config.clone(),
            backups_dir: paths.backups_dir.clone(),
        }
    }

    /// Back up the live config as of now
    ///
    /// Returns `Ok(None)` without touching the store when there is no
    /// readable live config.
    ///
    /// # Errors
    /// Returns an error if the backup cannot be written
    pub fn create(&self) -> Result<Option<String>, StorageError> {
        self.create_at(Local::now())
    }

    /// Back up the live config with an explicit timestamp
    ///
    /// # Errors
    /// Returns an error if the backup cannot be written
    pub fn create_at(&self, now: DateTime<Local>) -> Result<Option<String>, StorageError> {
        let Some(document) = storage::load_optional(&self.live_config) else {
            tracing::debug!(path = %self.live_config.display(), "no live config to back up");
            return Ok(None);
        };

        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let name = self.unused_name(&timestamp);
        let path = self.backups_dir.join(&name);

        storage::save(&path, &document)?;
        tracing::info!(backup = %name, "backed up live config");
        Ok(Some(name))
    }

    /// `config.<ts>.json`, or `config.<ts>_<nnn>.json` if that second is taken
    ///
    /// `_` sorts after `.` and the counter is zero-padded, so same-second
    /// backups still list newest first.
    fn unused_name(&self, timestamp: &str) -> String {
        let base = format!("{PREFIX}{timestamp}{SUFFIX}");
        if !self.backups_dir.join(&base).exists() {
            return base;
        }
        (2..)
            .map(|n| format!("{PREFIX}{timestamp}_{n:03}{SUFFIX}"))
            .find(|name| !self.backups_dir.join(name).exists())
            .unwrap_or(base)
    }

    /// List the newest backups
    #[must_use]
    pub fn list(&self) -> BackupListing {
        let mut names = backup_names(&self.backups_dir);
        names.sort_unstable_by(|a, b| b.cmp(a));

        let older = names.len().saturating_sub(LISTING_LIMIT);
        names.truncate(LISTING_LIMIT);

        BackupListing {
            dir: self.backups_dir.clone(),
            recent: names,
            older,
        }
    }
}

fn backup_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|entry| entry.file_name().to_str().map(String::from))
        .filter(|name| is_backup_name(name))
        .collect()
}

fn is_backup_name(name: &str) -> bool {
    name.len() > PREFIX.len() + SUFFIX.len() && name.starts_with(PREFIX) && name.ends_with(SUFFIX)
}
