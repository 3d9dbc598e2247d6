//! CLI command implementations
//!
//! A run follows a fixed sequence:
//! 1. Configuration load (file, environment, flags)
//! 2. Target check; an empty list stops here
//! 3. Extraction, generation, execution, evaluation
//! 4. Console output and report artifacts
//!
//! Failing checks do not make a command fail.

use std::path::Path;

use crate::config::Config;
use crate::executor::SqliteSource;
use crate::extractor::extract;
use crate::generator::Generator;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::pipeline::{Pipeline, Summary};
use crate::report::{console_line, summary_line, write_reports};

use super::args::{Cli, Command};
use super::errors::CliResult;
use super::io::{read_notes, write_json, write_lines};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Run {
            release_file,
            config,
            database,
            out_dir,
            log_level,
        } => {
            let mut config = load_config(&config, log_level)?.with_target(database);
            if let Some(out_dir) = out_dir {
                config.out_dir = out_dir;
            }
            run_notes(&config, &release_file)
        }
        Command::Generate {
            release_file,
            config,
            log_level,
        } => generate(&load_config(&config, log_level)?, &release_file),
        Command::ListDatabases { config } => list_databases(&load_config(&config, None)?),
    }
}

/// Load configuration and apply the log threshold
pub fn load_config(path: &Path, log_level: Option<Severity>) -> CliResult<Config> {
    let mut config = Config::load(path)?;
    if let Some(level) = log_level {
        config.log_level = level;
    }
    Logger::set_min_severity(config.log_level);

    let targets = config.targets.join(",");
    let use_llm = config.use_llm.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("targets", targets.as_str()), ("use_llm", use_llm.as_str())],
    );
    Ok(config)
}

/// Run every check generated from a release-notes file and write reports
pub fn run_notes(config: &Config, release_file: &Path) -> CliResult<()> {
    let text = read_notes(release_file)?;

    let generator = Generator::from_config(config);
    let source = SqliteSource::from_config(config);
    let verdicts = Pipeline::new(config, &generator, &source).run(&text)?;

    write_lines(verdicts.iter().map(console_line))?;
    write_lines([summary_line(&Summary::of(&verdicts))])?;

    let paths = write_reports(&verdicts, &config.out_dir)?;
    write_lines([format!(
        "Reports written to {} and {}",
        paths.markdown.display(),
        paths.json.display()
    )])?;

    Ok(())
}

/// Print generated descriptors without executing anything
pub fn generate(config: &Config, release_file: &Path) -> CliResult<()> {
    let text = read_notes(release_file)?;
    let descriptors = Generator::from_config(config).generate(&extract(&text));
    write_json(&descriptors)
}

/// Print the configured targets
pub fn list_databases(config: &Config) -> CliResult<()> {
    let listed = if config.has_targets() {
        config.targets.join(", ")
    } else {
        "None".to_string()
    };
    write_lines([format!("Configured databases: {}", listed)])
}
