//! mcp-modes - switch between connector mode profiles
//!
//! Provides `mcp-modes list`, `current`, `switch`, `save`, `backups`, and
//! `serve` for running as an MCP server on stdio.

mod commands;
mod protocol;
mod tools;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use modes_core::restart::{platform_restarter, DEFAULT_APP_NAME};
use modes_core::{ModePaths, ModeSwitcher, NoopRestarter, Restarter};
use tracing_subscriber::EnvFilter;

use commands::modes::ModeCommands;

#[derive(Parser)]
#[command(name = "mcp-modes")]
#[command(about = "Switch between MCP connector mode profiles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Application config directory (defaults to the platform location)
    #[arg(long, global = true, env = "MCP_MODES_APP_DIR")]
    app_dir: Option<PathBuf>,

    /// Do not restart the application after switching
    #[arg(long, global = true, env = "MCP_MODES_NO_RESTART")]
    no_restart: bool,

    /// Application to restart after switching
    #[arg(long, global = true, env = "MCP_MODES_APP_NAME", default_value = DEFAULT_APP_NAME)]
    app_name: String,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Modes(ModeCommands),
    /// Run as an MCP server on stdio
    Serve,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    // stdout carries the MCP protocol, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = match &cli.app_dir {
        Some(dir) => ModePaths::from_app_dir(dir),
        None => ModePaths::detect()
            .context("could not locate the application config directory; pass --app-dir")?,
    };

    let restarter: Box<dyn Restarter> = if cli.no_restart {
        Box::new(NoopRestarter)
    } else {
        platform_restarter(&cli.app_name)
    };
    let switcher = ModeSwitcher::new(paths, restarter);

    match cli.command {
        Commands::Modes(command) => {
            let text = commands::modes::execute(command, &switcher);
            if let Some(message) = text.strip_prefix("Error: ") {
                anyhow::bail!("{message}");
            }
            println!("{text}");
            Ok(())
        }
        Commands::Serve => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start runtime")?;
            runtime.block_on(commands::serve::run(&switcher))
        }
    }
}
