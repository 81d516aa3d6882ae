// src/bin/decaf.rs

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use decaf::cli::{Cli, Commands};
use decaf::commands::check::check_file;
use decaf::commands::scopes::dump_scopes;

fn main() -> ExitCode {
    // Initialize tracing if DECAF_LOG is set
    if let Ok(filter) = EnvFilter::try_from_env("DECAF_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Check { file } => check_file(&file),
        Commands::Scopes { file } => dump_scopes(&file),
    }
}
