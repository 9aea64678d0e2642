//! On-disk layout of the live config, profiles, manifest and backups

use std::path::{Path, PathBuf};

use crate::error::ModeError;
use crate::util::validate_name;

/// Live configuration file name inside the host app directory
pub const LIVE_CONFIG_FILE: &str = "claude_desktop_config.json";

/// Directory holding one `<mode>.json` per profile
pub const PROFILES_DIR: &str = "configs";

/// Manifest file inside the profiles directory
pub const MANIFEST_FILE: &str = "modes.json";

/// Directory holding timestamped backups of the live config
pub const BACKUPS_DIR: &str = "backups";

/// Paths every component works against
///
/// Passed explicitly instead of living in globals so the whole engine can run
/// against a temporary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModePaths {
    /// The live configuration document
    pub live_config: PathBuf,
    /// Directory of profile documents
    pub profiles_dir: PathBuf,
    /// Optional manifest listing profiles with metadata
    pub manifest: PathBuf,
    /// Backup store
    pub backups_dir: PathBuf,
}

impl ModePaths {
    /// Standard layout under a host application directory
    #[must_use]
    pub fn from_app_dir(app_dir: &Path) -> Self {
        let profiles_dir = app_dir.join(PROFILES_DIR);
        Self {
            live_config: app_dir.join(LIVE_CONFIG_FILE),
            manifest: profiles_dir.join(MANIFEST_FILE),
            profiles_dir,
            backups_dir: app_dir.join(BACKUPS_DIR),
        }
    }

    /// Locate the host application directory for the current platform
    ///
    /// Returns `None` if the platform has no home/config directory.
    #[must_use]
    pub fn detect() -> Option<Self> {
        default_app_dir().map(|dir| Self::from_app_dir(&dir))
    }

    /// Path of the config file backing a profile
    ///
    /// # Errors
    /// Returns an error if the name would not stay inside the profiles directory
    pub fn profile_config(&self, name: &str) -> Result<PathBuf, ModeError> {
        validate_name(name).map_err(|e| ModeError::InvalidName(e.to_string()))?;
        Ok(self.profiles_dir.join(format!("{name}.json")))
    }

    /// Stem of the manifest file, which no profile may use as its name
    #[must_use]
    pub fn manifest_stem(&self) -> String {
        self.manifest
            .file_stem()
            .map_or_else(|| "modes".to_string(), |s| s.to_string_lossy().to_string())
    }
}

#[cfg(target_os = "macos")]
fn default_app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join("Library").join("Application Support").join("Claude"))
}

#[cfg(not(target_os = "macos"))]
fn default_app_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("Claude"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_app_dir_layout() {
        let paths = ModePaths::from_app_dir(Path::new("/tmp/app"));
        assert_eq!(
            paths.live_config,
            PathBuf::from("/tmp/app/claude_desktop_config.json")
        );
        assert_eq!(paths.profiles_dir, PathBuf::from("/tmp/app/configs"));
        assert_eq!(paths.manifest, PathBuf::from("/tmp/app/configs/modes.json"));
        assert_eq!(paths.backups_dir, PathBuf::from("/tmp/app/backups"));
        assert_eq!(paths.manifest_stem(), "modes");
    }

    #[test]
    fn test_profile_config_path() {
        let paths = ModePaths::from_app_dir(Path::new("/tmp/app"));
        assert_eq!(
            paths.profile_config("coding").unwrap(),
            PathBuf::from("/tmp/app/configs/coding.json")
        );
    }

    #[test]
    fn test_profile_config_rejects_traversal() {
        let paths = ModePaths::from_app_dir(Path::new("/tmp/app"));
        assert!(matches!(
            paths.profile_config("../secrets"),
            Err(ModeError::InvalidName(_))
        ));
        assert!(paths.profile_config("a/b").is_err());
    }
}
