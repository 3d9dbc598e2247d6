//! Report rendering
//!
//! Persists a verdict sequence as `report.md` (human-readable) and
//! `results.json` (machine-readable), and renders console lines.
//! Verdicts are grouped by database in first-appearance order.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event};
use crate::pipeline::{Summary, Verdict, NOT_APPLICABLE};

/// Markdown report file name
pub const MARKDOWN_FILE: &str = "report.md";
/// JSON report file name
pub const JSON_FILE: &str = "results.json";

/// Result type for report writing
pub type ReportResult<T> = Result<T, ReportError>;

/// Report writing errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Paths of the written artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// Path of `report.md`
    pub markdown: PathBuf,
    /// Path of `results.json`
    pub json: PathBuf,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: &'a str,
    summary: Summary,
    databases: Vec<&'a str>,
    results: &'a [Verdict],
}

/// Write both reports into `out_dir`, stamped with the local time
pub fn write_reports(verdicts: &[Verdict], out_dir: &Path) -> ReportResult<ReportPaths> {
    let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    write_reports_at(verdicts, out_dir, &generated)
}

/// Write both reports with an explicit timestamp
pub fn write_reports_at(
    verdicts: &[Verdict],
    out_dir: &Path,
    generated: &str,
) -> ReportResult<ReportPaths> {
    fs::create_dir_all(out_dir).map_err(|source| ReportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let paths = ReportPaths {
        markdown: out_dir.join(MARKDOWN_FILE),
        json: out_dir.join(JSON_FILE),
    };

    write_file(&paths.markdown, &render_markdown(verdicts, generated))?;
    write_file(&paths.json, &render_json(verdicts, generated)?)?;

    let count = verdicts.len().to_string();
    let dir = out_dir.display().to_string();
    log_event_with_fields(
        Event::ReportsWritten,
        &[("out_dir", dir.as_str()), ("verdicts", count.as_str())],
    );

    Ok(paths)
}

fn write_file(path: &Path, content: &str) -> ReportResult<()> {
    fs::write(path, content).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Verdicts grouped by database, groups and members in original order
pub fn group_by_database(verdicts: &[Verdict]) -> Vec<(&str, Vec<&Verdict>)> {
    let mut groups: Vec<(&str, Vec<&Verdict>)> = Vec::new();
    for verdict in verdicts {
        match groups.iter_mut().find(|(db, _)| *db == verdict.database) {
            Some((_, members)) => members.push(verdict),
            None => groups.push((verdict.database.as_str(), vec![verdict])),
        }
    }
    groups
}

/// Render the markdown report
pub fn render_markdown(verdicts: &[Verdict], generated: &str) -> String {
    let mut out = format!("# Release Check Report\n\nGenerated: {}\n\n", generated);

    for (db, members) in group_by_database(verdicts) {
        if db != NOT_APPLICABLE {
            out.push_str(&format!("## Database: {}\n\n", db));
        }
        for verdict in members {
            out.push_str(&format!(
                "{} **{}** → {}\n\n",
                status_icon(verdict.passed),
                verdict.base_feature(),
                verdict.expectation
            ));
            out.push_str(&format!("- Runner: {}\n", verdict.runner));
            out.push_str(&format!("- Message: {}\n\n", verdict.message));
        }
    }

    out
}

/// Render the JSON report
pub fn render_json(verdicts: &[Verdict], generated: &str) -> ReportResult<String> {
    let report = JsonReport {
        generated,
        summary: Summary::of(verdicts),
        databases: group_by_database(verdicts)
            .into_iter()
            .map(|(db, _)| db)
            .collect(),
        results: verdicts,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// One console line for a verdict
pub fn console_line(verdict: &Verdict) -> String {
    if verdict.is_skipped() {
        format!("• {}: ⚠️ Skipped (non-SQL)", verdict.feature)
    } else {
        format!(
            "• {} [{}]: {} - {}",
            verdict.base_feature(),
            verdict.database,
            status_icon(verdict.passed),
            verdict.message
        )
    }
}

/// Console summary line; skips are not counted as failures
pub fn summary_line(summary: &Summary) -> String {
    format!(
        "{} checks: {} passed, {} failed, {} skipped",
        summary.total, summary.passed, summary.failed, summary.skipped
    )
}

fn status_icon(passed: bool) -> &'static str {
    if passed {
        "✅"
    } else {
        "❌"
    }
}
