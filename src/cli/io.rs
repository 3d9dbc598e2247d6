//! Console I/O for the CLI
//!
//! - Input: release notes read from a UTF-8 file
//! - Output: human-readable lines or pretty JSON on stdout
//! - Logs never go to stdout

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use super::errors::{CliError, CliResult};

/// Read a release-notes file as UTF-8 text
pub fn read_notes(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write lines to stdout
pub fn write_lines<I, S>(lines: I) -> CliResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    out.flush()?;
    Ok(())
}

/// Write a value as pretty JSON to stdout
pub fn write_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
