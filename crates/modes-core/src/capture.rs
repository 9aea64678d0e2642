//! Capturing the live config as a new mode
//!
//! Capture is create-only. The first capture against a scanned catalog writes
//! the whole catalog out as a manifest, after which the manifest is the only
//! source of modes.

use std::path::PathBuf;

use crate::catalog::{Catalog, Profile};
use crate::connectors::ConnectorRules;
use crate::error::{ModeError, ModeResult};
use crate::paths::ModePaths;
use crate::storage;

/// Result of a capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub profile: Profile,
    /// Every connector in the captured config, reserved name included
    pub connectors: Vec<String>,
    /// The new mode's config file
    pub config_file: PathBuf,
    /// `false` if the config was saved but the manifest could not be updated
    pub manifest_updated: bool,
}

/// Lowercase, trim and hyphenate a user-supplied mode name
#[must_use]
pub fn normalize_mode_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "-")
}

/// Save the live config as mode `raw_name`
///
/// An empty `description` is synthesized from the connector list.
///
/// # Errors
/// Returns an error if the name is empty, reserved, invalid or taken, if the
/// live config cannot be read, or if the mode's config file cannot be written.
pub fn save_current_as_mode(
    paths: &ModePaths,
    rules: &ConnectorRules,
    raw_name: &str,
    description: &str,
    token_cost: &str,
) -> ModeResult<CaptureOutcome> {
    let name = normalize_mode_name(raw_name);
    if name.is_empty() {
        return Err(ModeError::EmptyName);
    }
    if name == paths.manifest_stem() {
        return Err(ModeError::ReservedName(name));
    }
    let config_file = paths.profile_config(&name)?;

    let mut catalog = Catalog::load(paths, rules);
    if catalog.contains(&name) || config_file.exists() {
        return Err(ModeError::DuplicateMode(name));
    }

    let live = storage::load_optional(&paths.live_config).ok_or(ModeError::LiveConfigUnreadable)?;

    let description = if description.trim().is_empty() {
        rules.describe(&live)
    } else {
        description.to_string()
    };
    let profile = Profile::new(name, description, token_cost);

    storage::save(&config_file, &live)?;
    tracing::info!(mode = %profile.name, path = %config_file.display(), "captured live config");

    catalog.insert(profile.clone());
    let manifest_updated = match storage::save(&paths.manifest, &catalog.to_manifest()) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "config captured but manifest update failed");
            false
        }
    };

    Ok(CaptureOutcome {
        profile,
        connectors: rules.all_names(&live),
        config_file,
        manifest_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSource;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ModePaths, ConnectorRules) {
        let dir = TempDir::new().unwrap();
        let paths = ModePaths::from_app_dir(dir.path());
        storage::save(
            &paths.live_config,
            &json!({"mcpServers": {"mcp-mode-switcher": {}, "github": {}, "notion": {}}}),
        )
        .unwrap();
        (dir, paths, ConnectorRules::default())
    }

    #[test]
    fn test_normalize_mode_name() {
        assert_eq!(normalize_mode_name("  Deep Research "), "deep-research");
        assert_eq!(normalize_mode_name("CODING"), "coding");
        assert_eq!(normalize_mode_name("   "), "");
        assert_eq!(normalize_mode_name("Modes "), "modes");
    }

    #[test]
    fn test_capture_creates_config_and_manifest() {
        let (_dir, paths, rules) = setup();

        let outcome = save_current_as_mode(&paths, &rules, "Deep Work", "", "~8k").unwrap();

        assert_eq!(outcome.profile.name, "deep-work");
        assert_eq!(outcome.profile.description, "Connectors: github, notion");
        assert_eq!(outcome.profile.token_cost, "~8k");
        assert!(outcome.manifest_updated);
        assert_eq!(outcome.connectors.len(), 3);
        assert_eq!(
            storage::load(&outcome.config_file).unwrap(),
            storage::load(&paths.live_config).unwrap()
        );

        let catalog = Catalog::load(&paths, &rules);
        assert_eq!(catalog.source(), CatalogSource::Manifest);
        assert_eq!(catalog.get("deep-work").unwrap().token_cost, "~8k");
    }

    #[test]
    fn test_capture_materializes_scanned_catalog() {
        let (_dir, paths, rules) = setup();
        storage::save(
            &paths.profiles_dir.join("minimal.json"),
            &json!({"mcpServers": {"mcp-mode-switcher": {}}}),
        )
        .unwrap();

        save_current_as_mode(&paths, &rules, "full", "Everything", "unknown").unwrap();

        let manifest = storage::load(&paths.manifest).unwrap();
        assert_eq!(
            manifest,
            json!({
                "minimal": {"description": "No connectors", "token_cost": "unknown"},
                "full": {"description": "Everything", "token_cost": "unknown"}
            })
        );
    }

    #[test]
    fn test_rejects_empty_and_reserved_names() {
        let (_dir, paths, rules) = setup();

        assert!(matches!(
            save_current_as_mode(&paths, &rules, "  ", "", "unknown"),
            Err(ModeError::EmptyName)
        ));
        assert!(matches!(
            save_current_as_mode(&paths, &rules, "Modes ", "", "unknown"),
            Err(ModeError::ReservedName(name)) if name == "modes"
        ));
        assert!(matches!(
            save_current_as_mode(&paths, &rules, "../up", "", "unknown"),
            Err(ModeError::InvalidName(_))
        ));
        assert!(!paths.profiles_dir.exists());
    }

    #[test]
    fn test_duplicate_performs_no_writes() {
        let (_dir, paths, rules) = setup();
        storage::save(
            &paths.profiles_dir.join("coding.json"),
            &json!({"mcpServers": {"github": {}}}),
        )
        .unwrap();
        let before = fs::read(paths.profiles_dir.join("coding.json")).unwrap();

        let err = save_current_as_mode(&paths, &rules, "Coding", "", "unknown").unwrap_err();

        assert!(matches!(err, ModeError::DuplicateMode(ref n) if n == "coding"));
        assert_eq!(err.code(), "CONFLICT");
        assert_eq!(fs::read(paths.profiles_dir.join("coding.json")).unwrap(), before);
        assert!(!paths.manifest.exists());
    }

    #[test]
    fn test_unlisted_file_on_disk_is_duplicate() {
        let (_dir, paths, rules) = setup();
        storage::save(&paths.manifest, &json!({"a": {}})).unwrap();
        let handmade = paths.profiles_dir.join("b.json");
        fs::write(&handmade, r#"{"mcpServers":{"handmade":{"secret":"keep me"}}}"#).unwrap();
        let before = fs::read(&handmade).unwrap();

        let err = save_current_as_mode(&paths, &rules, "b", "", "unknown").unwrap_err();

        assert!(matches!(err, ModeError::DuplicateMode(ref n) if n == "b"));
        assert_eq!(fs::read(&handmade).unwrap(), before);
        assert_eq!(storage::load(&paths.manifest).unwrap(), json!({"a": {}}));
    }

    #[test]
    fn test_missing_live_config_is_hard_failure() {
        let (_dir, paths, rules) = setup();
        fs::remove_file(&paths.live_config).unwrap();

        let err = save_current_as_mode(&paths, &rules, "x", "", "unknown").unwrap_err();
        assert!(matches!(err, ModeError::LiveConfigUnreadable));
        assert!(!paths.profiles_dir.join("x.json").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_manifest_failure_is_partial_success() {
        let (_dir, paths, rules) = setup();
        // A directory where the manifest file should be makes the rename fail
        fs::create_dir_all(paths.manifest.join("blocker")).unwrap();

        let outcome = save_current_as_mode(&paths, &rules, "partial", "", "unknown").unwrap();

        assert!(!outcome.manifest_updated);
        assert!(outcome.config_file.exists());
    }
}
