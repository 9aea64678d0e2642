//! Switching the live config to a mode
//!
//! validate -> confirmation gate -> backup -> write -> restart.
//! Nothing before the gate touches the disk, and nothing is retried.

use std::path::PathBuf;

use crate::backup::BackupManager;
use crate::catalog::{Catalog, Profile};
use crate::connectors::ConnectorRules;
use crate::error::{ModeError, ModeResult};
use crate::paths::ModePaths;
use crate::restart::Restarter;
use crate::storage;

/// What a switch request did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Not confirmed; nothing was changed
    NeedsConfirmation {
        profile: Profile,
        /// Connectors the switch would enable, `None` if the live config is unreadable
        added: Option<Vec<String>>,
        /// Connectors the switch would disable, `None` if the live config is unreadable
        removed: Option<Vec<String>>,
    },
    /// The live config now holds the mode's config and a restart was triggered
    Switched {
        profile: Profile,
        /// Backup file name, if one was taken
        backup: Option<String>,
        warnings: Vec<String>,
    },
}

/// Collaborators a switch needs
pub struct SwitchContext<'a> {
    pub paths: &'a ModePaths,
    pub rules: &'a ConnectorRules,
    pub catalog: &'a Catalog,
    pub restarter: &'a dyn Restarter,
}

/// Switch to `mode`, or describe the switch when `confirmed` is false
///
/// # Errors
/// Returns an error if the mode is unknown or has no config file, if the
/// config file cannot be read at execution time, or if writing the live
/// config fails. A failed backup is only a warning.
pub fn switch_mode(ctx: &SwitchContext<'_>, mode: &str, confirmed: bool) -> ModeResult<SwitchOutcome> {
    let (profile, config_path) = validate(ctx, mode)?;

    if !confirmed {
        return Ok(preview(ctx, profile, &config_path));
    }

    execute(ctx, profile, &config_path)
}

fn validate(ctx: &SwitchContext<'_>, mode: &str) -> ModeResult<(Profile, PathBuf)> {
    let profile = ctx
        .catalog
        .get(mode)
        .cloned()
        .ok_or_else(|| ModeError::UnknownMode {
            name: mode.to_string(),
            available: ctx.catalog.names(),
        })?;

    let config_path = profile.config_path(ctx.paths)?;
    if !config_path.is_file() {
        return Err(ModeError::ConfigMissing(config_path));
    }

    Ok((profile, config_path))
}

fn preview(ctx: &SwitchContext<'_>, profile: Profile, config_path: &std::path::Path) -> SwitchOutcome {
    let live = storage::load_optional(&ctx.paths.live_config).map(|doc| ctx.rules.connector_set(&doc));
    let target = storage::load_optional(config_path).map(|doc| ctx.rules.connector_set(&doc));

    let (added, removed) = match (live, target) {
        (Some(live), Some(target)) => (
            Some(target.missing_from(&live)),
            Some(live.missing_from(&target)),
        ),
        _ => (None, None),
    };

    SwitchOutcome::NeedsConfirmation {
        profile,
        added,
        removed,
    }
}

fn execute(
    ctx: &SwitchContext<'_>,
    profile: Profile,
    config_path: &std::path::Path,
) -> ModeResult<SwitchOutcome> {
    let mut warnings = Vec::new();

    let backup = match BackupManager::new(ctx.paths).create() {
        Ok(Some(name)) => Some(name),
        Ok(None) => {
            warnings.push("Backup skipped: current config could not be read".to_string());
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "backup failed, switching anyway");
            warnings.push(format!("Backup failed: {e}"));
            None
        }
    };

    // The file may have vanished or changed since validation
    let bytes = storage::read_raw(config_path)
        .and_then(|bytes| storage::parse(config_path, &bytes).map(|_| bytes))
        .map_err(|e| {
            tracing::warn!(error = %e, "mode config unreadable at switch time");
            ModeError::ConfigUnreadable(config_path.to_path_buf())
        })?;

    storage::write_atomic(&ctx.paths.live_config, &bytes)
        .map_err(|e| ModeError::SwitchFailed(e.to_string()))?;
    tracing::info!(mode = %profile.name, backup = ?backup, "switched live config");

    ctx.restarter.trigger();

    Ok(SwitchOutcome::Switched {
        profile,
        backup,
        warnings,
    })
}
