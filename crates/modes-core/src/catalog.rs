//! Profile catalog
//!
//! The catalog comes from exactly one of two places: the manifest
//! (`modes.json`) when it exists and lists at least one mode, otherwise a
//! scan of `*.json` files in the profiles directory. The two are never merged.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::connectors::ConnectorRules;
use crate::error::ModeError;
use crate::paths::ModePaths;
use crate::storage;
use crate::util::validate_name;

/// Token cost recorded when nobody supplied one
pub const UNKNOWN_TOKEN_COST: &str = "unknown";

/// Description shown for manifest entries that omit one
pub const NO_DESCRIPTION: &str = "No description";

/// A named mode and its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub token_cost: String,
}

impl Profile {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        token_cost: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            token_cost: token_cost.into(),
        }
    }

    /// Path of the file backing this profile
    ///
    /// # Errors
    /// Returns an error if the name is not usable as a file name
    pub fn config_path(&self, paths: &ModePaths) -> Result<PathBuf, ModeError> {
        paths.profile_config(&self.name)
    }
}

/// Manifest value for one mode
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ManifestEntry {
    #[serde(default = "default_description")]
    description: String,
    #[serde(default = "default_token_cost")]
    token_cost: String,
}

fn default_description() -> String {
    NO_DESCRIPTION.to_string()
}

fn default_token_cost() -> String {
    UNKNOWN_TOKEN_COST.to_string()
}

/// Where a catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Manifest,
    Scan,
}

/// Known modes in discovery order
#[derive(Debug, Clone)]
pub struct Catalog {
    source: CatalogSource,
    profiles: Vec<Profile>,
}

impl Catalog {
    /// Resolve the catalog from disk
    ///
    /// Never fails: unreadable profile files are skipped and an unreadable
    /// manifest falls back to scanning.
    #[must_use]
    pub fn load(paths: &ModePaths, rules: &ConnectorRules) -> Self {
        if let Some(catalog) = Self::from_manifest(paths) {
            return catalog;
        }
        Self::scan(paths, rules)
    }

    fn from_manifest(paths: &ModePaths) -> Option<Self> {
        let document = storage::load_optional(&paths.manifest)?;
        let Some(entries) = document.as_object() else {
            tracing::warn!(path = %paths.manifest.display(), "manifest is not an object, scanning instead");
            return None;
        };
        if entries.is_empty() {
            return None;
        }

        let profiles = entries
            .iter()
            .map(|(name, value)| {
                let entry: ManifestEntry =
                    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                        tracing::warn!(mode = %name, error = %e, "malformed manifest entry");
                        ManifestEntry {
                            description: default_description(),
                            token_cost: default_token_cost(),
                        }
                    });
                Profile::new(name.clone(), entry.description, entry.token_cost)
            })
            .collect();

        Some(Self {
            source: CatalogSource::Manifest,
            profiles,
        })
    }

    fn scan(paths: &ModePaths, rules: &ConnectorRules) -> Self {
        let manifest_name = paths.manifest.file_name();
        let mut profiles = Vec::new();

        for entry in WalkDir::new(&paths.profiles_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("json")
                || path.file_name() == manifest_name
            {
                continue;
            }

            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            if validate_name(&name).is_err() {
                tracing::debug!(path = %path.display(), "skipping file with unusable name");
                continue;
            }

            let Some(document) = storage::load_optional(path) else {
                tracing::warn!(path = %path.display(), "skipping unreadable profile");
                continue;
            };
            if !rules.has_collection(&document) {
                tracing::debug!(path = %path.display(), "skipping file without connectors");
                continue;
            }

            profiles.push(Profile::new(
                name,
                rules.describe(&document),
                UNKNOWN_TOKEN_COST,
            ));
        }

        tracing::debug!(count = profiles.len(), dir = %paths.profiles_dir.display(), "scanned profiles");
        Self {
            source: CatalogSource::Scan,
            profiles,
        }
    }

    #[must_use]
    pub fn source(&self) -> CatalogSource {
        self.source
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Mode names in catalog order
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Append a profile, replacing any existing one with the same name
    pub fn insert(&mut self, profile: Profile) {
        if let Some(existing) = self.profiles.iter_mut().find(|p| p.name == profile.name) {
            *existing = profile;
        } else {
            self.profiles.push(profile);
        }
    }

    /// Manifest document for the whole catalog
    #[must_use]
    pub fn to_manifest(&self) -> Value {
        let mut entries = Map::new();
        for profile in &self.profiles {
            let entry = ManifestEntry {
                description: profile.description.clone(),
                token_cost: profile.token_cost.clone(),
            };
            entries.insert(
                profile.name.clone(),
                serde_json::to_value(entry).unwrap_or(Value::Null),
            );
        }
        Value::Object(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ModePaths) {
        let dir = TempDir::new().unwrap();
        let paths = ModePaths::from_app_dir(dir.path());
        fs::create_dir_all(&paths.profiles_dir).unwrap();
        (dir, paths)
    }

    fn write(path: &std::path::Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_empty_when_nothing_exists() {
        let dir = TempDir::new().unwrap();
        let paths = ModePaths::from_app_dir(dir.path());

        let catalog = Catalog::load(&paths, &ConnectorRules::default());
        assert!(catalog.is_empty());
        assert_eq!(catalog.source(), CatalogSource::Scan);
    }

    #[test]
    fn test_manifest_wins_over_scan() {
        let (_dir, paths) = setup();
        write(
            &paths.profiles_dir.join("full.json"),
            r#"{"mcpServers": {"a": {}}}"#,
        );
        write(
            &paths.manifest,
            r#"{"minimal": {"description": "Just the basics", "token_cost": "~5k"}}"#,
        );

        let catalog = Catalog::load(&paths, &ConnectorRules::default());
        assert_eq!(catalog.source(), CatalogSource::Manifest);
        assert_eq!(catalog.names(), vec!["minimal".to_string()]);

        let minimal = catalog.get("minimal").unwrap();
        assert_eq!(minimal.description, "Just the basics");
        assert_eq!(minimal.token_cost, "~5k");
        assert!(!catalog.contains("full"));
    }

    #[test]
    fn test_manifest_keeps_key_order() {
        let (_dir, paths) = setup();
        write(
            &paths.manifest,
            r#"{"zeta": {}, "alpha": {}, "mid": {"description": "m"}}"#,
        );

        let catalog = Catalog::load(&paths, &ConnectorRules::default());
        assert_eq!(catalog.names(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(catalog.get("zeta").unwrap().description, NO_DESCRIPTION);
        assert_eq!(catalog.get("zeta").unwrap().token_cost, UNKNOWN_TOKEN_COST);
    }

    #[test]
    fn test_empty_manifest_falls_back_to_scan() {
        let (_dir, paths) = setup();
        write(&paths.manifest, "{}");
        write(
            &paths.profiles_dir.join("coding.json"),
            r#"{"mcpServers": {"github": {}, "mcp-mode-switcher": {}}}"#,
        );

        let catalog = Catalog::load(&paths, &ConnectorRules::default());
        assert_eq!(catalog.source(), CatalogSource::Scan);
        let coding = catalog.get("coding").unwrap();
        assert_eq!(coding.description, "Connectors: github");
        assert_eq!(coding.token_cost, UNKNOWN_TOKEN_COST);
    }

    #[test]
    fn test_scan_skips_malformed_and_non_json() {
        let (_dir, paths) = setup();
        write(&paths.profiles_dir.join("broken.json"), "{ nope");
        write(&paths.profiles_dir.join("notes.txt"), "hello");
        write(&paths.profiles_dir.join("other.json"), r#"{"theme": "dark"}"#);
        write(
            &paths.profiles_dir.join("empty.json"),
            r#"{"mcpServers": {"mcp-mode-switcher": {}}}"#,
        );

        let catalog = Catalog::load(&paths, &ConnectorRules::default());
        assert_eq!(catalog.names(), vec!["empty".to_string()]);
        assert_eq!(catalog.get("empty").unwrap().description, "No connectors");
    }

    #[test]
    fn test_to_manifest_round_trip() {
        let (_dir, paths) = setup();
        let mut catalog = Catalog::load(&paths, &ConnectorRules::default());
        catalog.insert(Profile::new("writing", "Docs", "~10k"));
        catalog.insert(Profile::new("coding", "Code", "~20k"));

        assert_eq!(
            catalog.to_manifest(),
            json!({
                "writing": {"description": "Docs", "token_cost": "~10k"},
                "coding": {"description": "Code", "token_cost": "~20k"}
            })
        );

        storage::save(&paths.manifest, &catalog.to_manifest()).unwrap();
        let reloaded = Catalog::load(&paths, &ConnectorRules::default());
        assert_eq!(reloaded.source(), CatalogSource::Manifest);
        assert_eq!(reloaded.names(), vec!["writing", "coding"]);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let (_dir, paths) = setup();
        let mut catalog = Catalog::load(&paths, &ConnectorRules::default());
        catalog.insert(Profile::new("a", "one", "1"));
        catalog.insert(Profile::new("a", "two", "2"));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a").unwrap().description, "two");
    }
}
