//! CLI argument definitions using clap
//!
//! Commands:
//! - relcheck run <RELEASE_FILE> [--database <name>] [--out-dir <dir>]
//! - relcheck generate <RELEASE_FILE>
//! - relcheck list-databases

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::Severity;

/// relcheck - turn release notes into database checks
#[derive(Parser, Debug)]
#[command(name = "relcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate checks from release notes, run them and write reports
    Run {
        /// Path to release notes file (md/txt)
        release_file: PathBuf,

        /// Path to configuration file
        #[arg(long, default_value = "./relcheck.json")]
        config: PathBuf,

        /// Test only this database instead of every configured one
        #[arg(long, short = 'd')]
        database: Option<String>,

        /// Directory for report.md and results.json
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Minimum log level (trace, info, warn, error)
        #[arg(long)]
        log_level: Option<Severity>,
    },

    /// Print the generated checks as JSON without executing them
    Generate {
        /// Path to release notes file (md/txt)
        release_file: PathBuf,

        /// Path to configuration file
        #[arg(long, default_value = "./relcheck.json")]
        config: PathBuf,

        /// Minimum log level (trace, info, warn, error)
        #[arg(long)]
        log_level: Option<Severity>,
    },

    /// List the configured databases
    ListDatabases {
        /// Path to configuration file
        #[arg(long, default_value = "./relcheck.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args() {
        let cli = Cli::try_parse_from([
            "relcheck",
            "run",
            "notes.md",
            "-d",
            "db1",
            "--log-level",
            "warn",
        ])
        .unwrap();
        match cli.command {
            Command::Run {
                release_file,
                config,
                database,
                out_dir,
                log_level,
            } => {
                assert_eq!(release_file, PathBuf::from("notes.md"));
                assert_eq!(config, PathBuf::from("./relcheck.json"));
                assert_eq!(database.as_deref(), Some("db1"));
                assert_eq!(out_dir, None);
                assert_eq!(log_level, Some(Severity::Warn));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_list_databases() {
        let cli = Cli::try_parse_from(["relcheck", "list-databases"]).unwrap();
        assert!(matches!(cli.command, Command::ListDatabases { .. }));
    }

    #[test]
    fn test_bad_log_level_rejected() {
        assert!(Cli::try_parse_from(["relcheck", "generate", "n.md", "--log-level", "loud"]).is_err());
    }
}
