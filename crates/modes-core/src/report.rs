//! Text surface over the mode engine
//!
//! [`ModeSwitcher`] exposes each operation twice: a typed method for library
//! callers and a text method for agents and the CLI. The text methods never
//! fail; errors come back as `Error: ...` and partial successes as
//! `Warning: ...`.

use std::fmt::Write as _;

use crate::backup::{BackupListing, BackupManager};
use crate::capture::{self, CaptureOutcome};
use crate::catalog::Catalog;
use crate::connectors::ConnectorRules;
use crate::error::ModeResult;
use crate::paths::ModePaths;
use crate::reconcile::{self, MatchResult};
use crate::restart::Restarter;
use crate::storage;
use crate::switch::{self, SwitchContext, SwitchOutcome};

/// Mode engine bound to one set of paths and one restarter
pub struct ModeSwitcher {
    paths: ModePaths,
    rules: ConnectorRules,
    restarter: Box<dyn Restarter>,
}

impl ModeSwitcher {
    #[must_use]
    pub fn new(paths: ModePaths, restarter: Box<dyn Restarter>) -> Self {
        Self {
            paths,
            rules: ConnectorRules::default(),
            restarter,
        }
    }

    #[must_use]
    pub fn paths(&self) -> &ModePaths {
        &self.paths
    }

    // -------------------------------------------------------------------------
    // Typed operations
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn catalog(&self) -> Catalog {
        Catalog::load(&self.paths, &self.rules)
    }

    #[must_use]
    pub fn identify_current_mode(&self) -> MatchResult {
        reconcile::identify_current_mode(&self.paths, &self.rules, &self.catalog())
    }

    /// Switch the live config to `mode`
    ///
    /// # Errors
    /// See [`switch::switch_mode`]
    pub fn switch(&self, mode: &str, confirmed: bool) -> ModeResult<SwitchOutcome> {
        let catalog = self.catalog();
        let ctx = SwitchContext {
            paths: &self.paths,
            rules: &self.rules,
            catalog: &catalog,
            restarter: self.restarter.as_ref(),
        };
        switch::switch_mode(&ctx, mode, confirmed)
    }

    /// Capture the live config as a new mode
    ///
    /// # Errors
    /// See [`capture::save_current_as_mode`]
    pub fn save_current(
        &self,
        name: &str,
        description: &str,
        token_cost: &str,
    ) -> ModeResult<CaptureOutcome> {
        capture::save_current_as_mode(&self.paths, &self.rules, name, description, token_cost)
    }

    #[must_use]
    pub fn backups(&self) -> BackupListing {
        BackupManager::new(&self.paths).list()
    }

    // -------------------------------------------------------------------------
    // Text operations
    // -------------------------------------------------------------------------

    /// Every known mode with its status, metadata and connectors
    #[must_use]
    pub fn list_modes(&self) -> String {
        let catalog = self.catalog();
        if catalog.is_empty() {
            return format!(
                "No modes found. Mode profiles should be in:\n{}",
                self.paths.profiles_dir.display()
            );
        }

        let mut out = String::from("# Available Modes\n");
        let _ = writeln!(
            out,
            "({} is included in every mode)",
            self.rules.reserved_name
        );

        for profile in catalog.iter() {
            let path = profile.config_path(&self.paths);
            let status = match &path {
                Ok(p) if p.is_file() => "✓",
                Ok(_) => "✗ (config file missing)",
                Err(_) => "✗ (invalid mode name)",
            };

            let _ = write!(out, "\n## {} {status}", profile.name);
            let _ = write!(out, "\n- **Description**: {}", profile.description);
            let _ = write!(out, "\n- **Token cost**: {}", profile.token_cost);

            if let Some(document) = path.ok().and_then(|p| storage::load_optional(&p)) {
                let _ = write!(
                    out,
                    "\n- **Connectors**: {}",
                    self.rules.all_names(&document).join(", ")
                );
            }
        }

        out
    }

    /// The live connectors and which mode they match
    #[must_use]
    pub fn current_mode(&self) -> String {
        let (active, matched) = match self.identify_current_mode() {
            MatchResult::Unreadable => return "Error: Could not read current config".to_string(),
            MatchResult::Matched {
                profile, active, ..
            } => (active, Some(profile)),
            MatchResult::Custom { active, .. } => (active, None),
        };

        let mut out = String::from("# Current Configuration\n");
        let active = if active.is_empty() {
            "none".to_string()
        } else {
            active.join(", ")
        };
        let _ = writeln!(out, "**Active connectors**: {active}\n");

        match matched {
            Some(profile) => {
                let _ = writeln!(out, "**Current mode**: `{}`", profile.name);
                let _ = writeln!(out, "**Description**: {}", profile.description);
                let _ = write!(out, "**Token cost**: {}", profile.token_cost);
            }
            None => {
                out.push_str("**Current mode**: `custom` (does not match any known mode)\n");
                out.push_str("\nTo see available modes, use `list_modes()`");
            }
        }

        out
    }

    /// Switch modes, or explain what confirming would do
    #[must_use]
    pub fn switch_mode(&self, mode: &str, confirm: bool) -> String {
        match self.switch(mode, confirm) {
            Ok(SwitchOutcome::NeedsConfirmation {
                profile,
                added,
                removed,
            }) => {
                let mut out = String::from("⚠️ **WARNING: This action will restart the application!**\n\n");
                let _ = writeln!(out, "You are about to switch to **{}** mode:", profile.name);
                let _ = writeln!(out, "- {}", profile.description);
                let _ = writeln!(out, "- Estimated token cost: {}", profile.token_cost);
                if let (Some(added), Some(removed)) = (added, removed) {
                    let _ = writeln!(out, "- Connectors enabled: {}", list_or_none(&added));
                    let _ = writeln!(out, "- Connectors disabled: {}", list_or_none(&removed));
                }
                let _ = write!(
                    out,
                    "\n**This will:**\n1. Back up and replace `{}`\n2. Quit the application\n3. Reopen the application\n\n**You will lose this conversation!**\n\nTo proceed, call `switch_mode(mode=\"{}\", confirm=true)`",
                    file_name(&self.paths.live_config),
                    profile.name
                );
                out
            }
            Ok(SwitchOutcome::Switched {
                profile,
                backup,
                warnings,
            }) => {
                let mut out = format!("✓ Switching to **{}** mode...\n\n", profile.name);
                match backup {
                    Some(name) => {
                        let _ = writeln!(out, "Backup saved: `{name}`");
                    }
                    None => out.push_str("Warning: Backup failed\n"),
                }
                for warning in warnings {
                    let _ = writeln!(out, "- {warning}");
                }
                out.push_str("Config file updated. The application is restarting.\n\n");
                out.push_str("(This message may not be visible as the app is restarting)");
                out
            }
            Err(e) => format!("Error: {e}"),
        }
    }

    /// Capture the live config as a new mode
    #[must_use]
    pub fn save_current_as_mode(&self, name: &str, description: &str, token_cost: &str) -> String {
        match self.save_current(name, description, token_cost) {
            Ok(outcome) if !outcome.manifest_updated => format!(
                "Warning: Config saved to `{}` but failed to update `{}`. The mode can be switched to but may not be listed.",
                file_name(&outcome.config_file),
                file_name(&self.paths.manifest)
            ),
            Ok(outcome) => format!(
                "✓ Saved current config as **{name}** mode!\n\n**Description**: {description}\n**Token cost**: {cost}\n**Connectors**: {connectors}\n**Config file**: `{file}`\n\nYou can now switch to this mode anytime with `switch_mode(\"{name}\")`",
                name = outcome.profile.name,
                description = outcome.profile.description,
                cost = outcome.profile.token_cost,
                connectors = outcome.connectors.join(", "),
                file = file_name(&outcome.config_file),
            ),
            Err(e) => format!("Error: {e}"),
        }
    }

    /// The newest backups and how many older ones exist
    #[must_use]
    pub fn list_backups(&self) -> String {
        let listing = self.backups();
        if listing.is_empty() {
            return "No backups found. Backups are created automatically when switching modes."
                .to_string();
        }

        let mut out = String::from("# Configuration Backups\n");
        let _ = writeln!(out, "Location: `{}`\n", listing.dir.display());
        for name in &listing.recent {
            let _ = writeln!(out, "- `{name}`");
        }
        if listing.older > 0 {
            let _ = writeln!(out, "\n... and {} more", listing.older);
        }
        let _ = write!(
            out,
            "\nTo restore a backup, copy it to `{}` and restart the application.",
            file_name(&self.paths.live_config)
        );
        out
    }
}

fn list_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string())
}
