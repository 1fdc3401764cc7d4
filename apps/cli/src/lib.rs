//! # Orderly CLI Library
//!
//! Argument parsing, state setup and command dispatch for the `orderly`
//! binary.
//!
//! ## Module Organization
//! ```text
//! orderly_cli/
//! ├── lib.rs          ◄─── You are here (Cli, tracing, run)
//! ├── state/          ◄─── ConfigState, CartState, SQLite session store
//! ├── commands/       ◄─── auth, products, cart, orders, users
//! └── error.rs        ◄─── CliError (code + one-line message)
//! ```
//!
//! ## Output Streams
//! Command output goes to stdout. Logs and errors go to stderr, so
//! `orderly products list > menu.txt` stays clean.

pub mod commands;
pub mod error;
pub mod state;

use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::Command;
use state::{AppState, ConfigState};

/// Order food from the terminal.
#[derive(Debug, Parser)]
#[command(name = "orderly", version, about)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "ORDERLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Installs the stderr subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - everything at debug
/// - `RUST_LOG=orderly_client=debug` - HTTP traffic only
/// - Default: `warn,orderly=info`, raised by `-v`
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn,orderly=info",
        1 => "info,sqlx=warn",
        _ => "debug,sqlx=warn,hyper=info,reqwest=info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Runs one command against freshly opened state.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConfigState::load(cli.config, cli.api_url)?;
    debug!(base_url = %config.client.api.base_url, "Configuration loaded");

    let state = AppState::open(config).await?;
    debug!(command = cli.command.name(), "Running command");

    let result = commands::dispatch(&state, cli.command).await;
    state.close().await;
    result.map_err(anyhow::Error::from)
}
