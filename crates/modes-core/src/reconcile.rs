//! Work out which mode the live config is in
//!
//! Two documents are the same mode when their connector sets are equal.
//! Nothing else in the documents is compared.

use crate::catalog::{Catalog, Profile};
use crate::connectors::{ConnectorRules, ConnectorSet};
use crate::paths::ModePaths;
use crate::storage;

/// Result of comparing the live config against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The live config has the same connectors as this profile
    Matched {
        profile: Profile,
        live: ConnectorSet,
        /// Every live connector, reserved name included, sorted
        active: Vec<String>,
    },
    /// No cataloged profile has the live connector set
    Custom { live: ConnectorSet, active: Vec<String> },
    /// The live config is missing or malformed
    Unreadable,
}

impl MatchResult {
    /// Name of the matched mode, if any
    #[must_use]
    pub fn mode_name(&self) -> Option<&str> {
        match self {
            Self::Matched { profile, .. } => Some(&profile.name),
            _ => None,
        }
    }
}

/// Find the first cataloged profile whose connector set equals the live one
///
/// Catalog order decides between profiles with identical connector sets.
#[must_use]
pub fn identify_current_mode(
    paths: &ModePaths,
    rules: &ConnectorRules,
    catalog: &Catalog,
) -> MatchResult {
    let Some(live_document) = storage::load_optional(&paths.live_config) else {
        return MatchResult::Unreadable;
    };
    let live = rules.connector_set(&live_document);
    let mut active = rules.all_names(&live_document);
    active.sort_unstable();

    for profile in catalog.iter() {
        let Ok(path) = profile.config_path(paths) else {
            continue;
        };
        let Some(document) = storage::load_optional(&path) else {
            continue;
        };
        if rules.connector_set(&document) == live {
            tracing::debug!(mode = %profile.name, "live config matches");
            return MatchResult::Matched {
                profile: profile.clone(),
                live,
                active,
            };
        }
    }

    MatchResult::Custom { live, active }
}
