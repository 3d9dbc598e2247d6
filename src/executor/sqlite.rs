//! SQLite-backed data source
//!
//! Each target names a database file under the data directory:
//! `<target>.db`, or `<target>` as-is when it already carries an extension.
//! Every call opens a fresh read-only connection and drops it before
//! returning, on success and on error alike.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::config::Config;

use super::errors::{ExecutorError, ExecutorResult};
use super::result::{Row, Value};
use super::source::DataSource;

/// Data source over SQLite files in one directory
#[derive(Debug, Clone)]
pub struct SqliteSource {
    data_dir: PathBuf,
}

impl SqliteSource {
    /// Create a source rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Create a source rooted at the configured data directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.data_dir)
    }

    /// Database file a target resolves to
    pub fn database_path(&self, target: &str) -> PathBuf {
        if Path::new(target).extension().is_some() {
            self.data_dir.join(target)
        } else {
            self.data_dir.join(format!("{}.db", target))
        }
    }
}

impl DataSource for SqliteSource {
    fn run_query(&self, query: &str, target: &str) -> ExecutorResult<Vec<Row>> {
        let path = self.database_path(target);
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            ExecutorError::execution_failed(target, format!("{}: {}", path.display(), e))
        })?;

        collect_rows(&conn, query).map_err(|e| ExecutorError::execution_failed(target, e.to_string()))
    }
}

fn collect_rows(conn: &Connection, query: &str) -> rusqlite::Result<Vec<Row>> {
    let mut stmt = conn.prepare(query)?;
    let column_count = stmt.column_count();
    let mut rows = stmt.query([])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            let value: rusqlite::types::Value = row.get(i)?;
            values.push(Value::from(value));
        }
        out.push(values);
    }
    Ok(out)
}
