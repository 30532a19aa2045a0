//! CLI command definitions

use clap::{Parser, Subcommand};

/// airmodel - inspect an Airtable connection from the command line
#[derive(Parser, Debug)]
#[command(name = "airmodel", version, about)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate credentials with a single probe call
    Check,

    /// List bases accessible to the configured token
    Bases,

    /// Print the table schemas of a base
    Schema {
        /// Base id (defaults to AIRTABLE_BASE_ID)
        #[arg(long)]
        base: Option<String>,
    },
}
