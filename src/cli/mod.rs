//! CLI module for relcheck
//!
//! Provides command-line interface for:
//! - run: Generate, execute and report checks for a release-notes file
//! - generate: Print generated checks without executing them
//! - list-databases: Show configured targets

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{generate, list_databases, load_config, run, run_command, run_notes};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_notes, write_json, write_lines};
