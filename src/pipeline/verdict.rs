//! Verdicts: the terminal pass/fail records of a run

use serde::Serialize;

use crate::evaluator::Evaluation;
use crate::executor::ExecutorError;
use crate::generator::{Runner, TestDescriptor};

/// Database value recorded for skipped descriptors.
pub const NOT_APPLICABLE: &str = "N/A";

/// Message recorded for skipped descriptors.
pub const SKIP_MESSAGE: &str = "Non-SQL or unsupported step; implement API/UI runner.";

/// How a verdict came about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Evaluated, expectation held
    Passed,
    /// Evaluated, expectation did not hold
    Failed,
    /// Query could not be executed on the target
    Error,
    /// Descriptor not runnable; never executed
    Skipped,
}

/// One verdict per (descriptor, target) pair, or one per skipped descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Feature label, suffixed with ` (<target>)` for executed descriptors
    pub feature: String,
    /// Expectation text of the descriptor
    pub expectation: String,
    /// Whether the check passed; always false for errors and skips
    pub passed: bool,
    /// Justification or error text
    pub message: String,
    /// Runner tag of the descriptor
    pub runner: Runner,
    /// Target identifier, or `N/A` when skipped
    pub database: String,
    /// Outcome class
    pub outcome: Outcome,
}

impl Verdict {
    /// Verdict for an evaluated result set
    pub fn evaluated(descriptor: &TestDescriptor, target: &str, evaluation: Evaluation) -> Self {
        let outcome = if evaluation.passed {
            Outcome::Passed
        } else {
            Outcome::Failed
        };
        Self {
            feature: qualified_feature(descriptor, target),
            expectation: descriptor.expectation().to_string(),
            passed: evaluation.passed,
            message: evaluation.message,
            runner: descriptor.runner(),
            database: target.to_string(),
            outcome,
        }
    }

    /// Failing verdict for a query that could not run
    pub fn execution_error(descriptor: &TestDescriptor, target: &str, error: &ExecutorError) -> Self {
        Self {
            feature: qualified_feature(descriptor, target),
            expectation: descriptor.expectation().to_string(),
            passed: false,
            message: format!("Execution error: {}", error),
            runner: descriptor.runner(),
            database: target.to_string(),
            outcome: Outcome::Error,
        }
    }

    /// Verdict for a descriptor that is never executed
    pub fn skipped(descriptor: &TestDescriptor) -> Self {
        Self {
            feature: descriptor.feature().to_string(),
            expectation: descriptor.expectation().to_string(),
            passed: false,
            message: SKIP_MESSAGE.to_string(),
            runner: descriptor.runner(),
            database: NOT_APPLICABLE.to_string(),
            outcome: Outcome::Skipped,
        }
    }

    /// True for skipped descriptors
    pub fn is_skipped(&self) -> bool {
        self.outcome == Outcome::Skipped
    }

    /// Feature label without the ` (<target>)` suffix
    pub fn base_feature(&self) -> &str {
        if self.is_skipped() {
            return &self.feature;
        }
        let suffix = format!(" ({})", self.database);
        self.feature.strip_suffix(&suffix).unwrap_or(&self.feature)
    }
}

fn qualified_feature(descriptor: &TestDescriptor, target: &str) -> String {
    format!("{} ({})", descriptor.feature(), target)
}

/// Counts over a verdict sequence. Skips are not failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Every verdict, skipped ones included
    pub total: usize,
    /// Verdicts that passed
    pub passed: usize,
    /// Failed evaluations plus execution errors
    pub failed: usize,
    /// Descriptors that were never executed
    pub skipped: usize,
}

impl Summary {
    /// Tally a verdict sequence
    pub fn of(verdicts: &[Verdict]) -> Self {
        let mut summary = Summary {
            total: verdicts.len(),
            ..Summary::default()
        };
        for verdict in verdicts {
            match verdict.outcome {
                Outcome::Passed => summary.passed += 1,
                Outcome::Failed | Outcome::Error => summary.failed += 1,
                Outcome::Skipped => summary.skipped += 1,
            }
        }
        summary
    }
}
