//! CLI definitions for the browser connector.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Browser connector CLI.
#[derive(Parser)]
#[command(name = "browser-connector")]
#[command(about = "Discovers and tracks the local browser tools server")]
#[command(version)]
pub(crate) struct Cli {
    /// Settings file path (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the session manager in the foreground (default)
    Run,

    /// Run one discovery scan and print the outcome
    Discover,

    /// Probe a single candidate's identity
    Check {
        /// Candidate host
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Candidate port
        #[arg(long, default_value_t = 3025)]
        port: u16,
    },
}
