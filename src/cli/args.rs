// src/cli/args.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Decaf compiler semantic analyzer
#[derive(Parser)]
#[command(name = "decaf")]
#[command(version = "0.1.0")]
#[command(about = "Decaf language semantic analyzer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a Decaf source file for errors
    Check {
        /// Path to the .decaf file to analyze
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Analyze a Decaf source file and dump its scope tree
    Scopes {
        /// Path to the .decaf file to analyze
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}
