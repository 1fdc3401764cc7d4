//! # Orderly Terminal Entry Point
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (stderr)
//! 3. Load config, open the local database, restore the session
//! 4. Run one command
//! 5. Print a one-line error and exit 1 on failure

use clap::Parser;
use std::process::ExitCode;

use orderly_cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    orderly_cli::init_tracing(cli.verbose);

    match orderly_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
