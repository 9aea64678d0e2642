//! One-shot mode commands
//!
//! Handles: mcp-modes list/current/switch/save/backups

use clap::Subcommand;
use modes_core::catalog::UNKNOWN_TOKEN_COST;
use modes_core::ModeSwitcher;

/// Mode commands
#[derive(Subcommand)]
pub enum ModeCommands {
    /// List all mode profiles
    List,
    /// Show which mode the current config matches
    Current,
    /// Switch to a mode (restarts the application)
    Switch {
        /// Mode name
        mode: String,
        /// Actually switch; without this only a preview is printed
        #[arg(long)]
        confirm: bool,
    },
    /// Save the current config as a new mode
    Save {
        /// Mode name (lowercased, spaces become hyphens)
        name: String,
        /// Optional description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Estimated token cost, e.g. "~20k tokens"
        #[arg(short, long, default_value = UNKNOWN_TOKEN_COST)]
        token_cost: String,
    },
    /// List recent config backups
    Backups,
}

/// Run a command and return its text result
pub fn execute(command: ModeCommands, switcher: &ModeSwitcher) -> String {
    match command {
        ModeCommands::List => switcher.list_modes(),
        ModeCommands::Current => switcher.current_mode(),
        ModeCommands::Switch { mode, confirm } => switcher.switch_mode(&mode, confirm),
        ModeCommands::Save {
            name,
            description,
            token_cost,
        } => switcher.save_current_as_mode(&name, &description, &token_cost),
        ModeCommands::Backups => switcher.list_backups(),
    }
}
