//! Modes Core - profile catalog, reconciliation and switching
//!
//! A "mode" is a named copy of the host application's configuration that
//! enables a particular set of connectors. This crate discovers the known
//! modes, works out which one the live configuration matches, switches the
//! live configuration to another mode (with a backup and an app restart) and
//! captures the live configuration as a new mode.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod backup;
pub mod capture;
pub mod catalog;
pub mod connectors;
pub mod error;
pub mod paths;
pub mod reconcile;
pub mod report;
pub mod restart;
pub mod storage;
pub mod switch;
pub mod util;

pub use backup::{BackupListing, BackupManager};
pub use capture::{normalize_mode_name, CaptureOutcome};
pub use catalog::{Catalog, CatalogSource, Profile};
pub use connectors::{ConnectorRules, ConnectorSet};
pub use error::{ModeError, ModeResult, StorageError};
pub use paths::ModePaths;
pub use reconcile::MatchResult;
pub use report::ModeSwitcher;
pub use restart::{CommandRestarter, NoopRestarter, Restarter};
pub use switch::SwitchOutcome;
