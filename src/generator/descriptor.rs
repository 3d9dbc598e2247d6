//! Test descriptor types

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a descriptor is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runner {
    /// Executed as a SQL query against every target
    Sql,
    /// Not automated; always reported as skipped
    Manual,
}

impl Runner {
    /// Returns the tag used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Runner::Sql => "sql",
            Runner::Manual => "manual",
        }
    }

    /// Parse a runner tag. Only the exact tag `sql` is executable.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "sql" {
            Runner::Sql
        } else {
            Runner::Manual
        }
    }
}

impl fmt::Display for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit of work: one structured, runnable-or-not check.
///
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestDescriptor {
    feature: String,
    query: String,
    expectation: String,
    runner: Runner,
}

impl TestDescriptor {
    /// Create a descriptor
    pub fn new(
        feature: impl Into<String>,
        query: impl Into<String>,
        expectation: impl Into<String>,
        runner: Runner,
    ) -> Self {
        Self {
            feature: feature.into(),
            query: query.into(),
            expectation: expectation.into(),
            runner,
        }
    }

    /// Create a non-runnable descriptor
    pub fn manual(feature: impl Into<String>, expectation: impl Into<String>) -> Self {
        Self::new(feature, "", expectation, Runner::Manual)
    }

    /// Short human label
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// SQL text, possibly empty
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Desired outcome, used to select the oracle
    pub fn expectation(&self) -> &str {
        &self.expectation
    }

    /// Runner tag
    pub fn runner(&self) -> Runner {
        self.runner
    }

    /// True when the descriptor may be sent to a data source.
    ///
    /// Requires `runner == sql`, a non-empty query, and a query that
    /// lexically starts with `select`. Everything else is skipped.
    pub fn is_runnable(&self) -> bool {
        self.runner == Runner::Sql && is_select(&self.query)
    }
}

fn is_select(query: &str) -> bool {
    let query = query.trim_start();
    query
        .get(..6)
        .map(|head| head.eq_ignore_ascii_case("select"))
        .unwrap_or(false)
}
