//! CLI module
//!
//! Command-line interface for inspecting the configured Airtable
//! connection.
//!
//! # Commands
//!
//! - `check` - Validate credentials with a single probe call
//! - `bases` - List bases accessible to the token
//! - `schema` - Print the table schemas of the configured base

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
