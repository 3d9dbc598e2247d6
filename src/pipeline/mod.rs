//! Note-to-test pipeline
//!
//! Data flows strictly forward:
//!
//! 1. Extract statements from release-note text
//! 2. Generate descriptors (rules, or generative backend with fallback)
//! 3. For each runnable descriptor, run its query on every target in order
//! 4. Evaluate each target's rows into a verdict
//!
//! Everything runs on the calling thread. Descriptors are visited in
//! generation order and targets in configured order; each target is fully
//! executed and evaluated before the next starts.
//!
//! Only a missing target list aborts a run, and it does so before
//! extraction. Execution errors become failing verdicts for that one
//! (descriptor, target) pair.

mod verdict;

pub use verdict::{Outcome, Summary, Verdict, NOT_APPLICABLE, SKIP_MESSAGE};

use thiserror::Error;

use crate::config::Config;
use crate::evaluator::evaluate;
use crate::executor::DataSource;
use crate::extractor::extract;
use crate::generator::{Generator, TestDescriptor};
use crate::observability::{log_event, log_event_with_fields, Event};

/// Result type for pipeline runs
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort a run before any execution
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No databases configured. Set RELCHECK_DATABASES or `databases` in the config file")]
    NoTargets,
}

/// One configured run: targets, generator and data source.
pub struct Pipeline<'a> {
    config: &'a Config,
    generator: &'a Generator,
    source: &'a dyn DataSource,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over borrowed components
    pub fn new(config: &'a Config, generator: &'a Generator, source: &'a dyn DataSource) -> Self {
        Self {
            config,
            generator,
            source,
        }
    }

    /// Run the whole pipeline on release-note text
    pub fn run(&self, text: &str) -> PipelineResult<Vec<Verdict>> {
        self.ensure_targets()?;
        let targets = self.config.targets.join(",");
        log_event_with_fields(Event::RunStart, &[("targets", targets.as_str())]);

        let statements = extract(text);
        let count = statements.len().to_string();
        log_event_with_fields(Event::NotesExtracted, &[("count", count.as_str())]);

        let descriptors = self.generator.generate(&statements);
        let verdicts = self.check_all(&descriptors)?;

        let summary = Summary::of(&verdicts);
        let (failed, passed, skipped, total) = (
            summary.failed.to_string(),
            summary.passed.to_string(),
            summary.skipped.to_string(),
            summary.total.to_string(),
        );
        log_event_with_fields(
            Event::RunComplete,
            &[
                ("failed", failed.as_str()),
                ("passed", passed.as_str()),
                ("skipped", skipped.as_str()),
                ("total", total.as_str()),
            ],
        );
        Ok(verdicts)
    }

    /// Execute and evaluate already-generated descriptors
    pub fn check_all(&self, descriptors: &[TestDescriptor]) -> PipelineResult<Vec<Verdict>> {
        self.ensure_targets()?;
        let mut verdicts = Vec::new();
        for descriptor in descriptors {
            self.check(descriptor, &mut verdicts);
        }
        Ok(verdicts)
    }

    /// Append the verdicts for one descriptor
    fn check(&self, descriptor: &TestDescriptor, verdicts: &mut Vec<Verdict>) {
        if !descriptor.is_runnable() {
            log_event_with_fields(
                Event::DescriptorSkipped,
                &[
                    ("feature", descriptor.feature()),
                    ("runner", descriptor.runner().as_str()),
                ],
            );
            verdicts.push(Verdict::skipped(descriptor));
            return;
        }

        for target in &self.config.targets {
            let verdict = match self.source.run_query(descriptor.query(), target) {
                Ok(rows) => {
                    let count = rows.len().to_string();
                    log_event_with_fields(
                        Event::TargetExecuted,
                        &[
                            ("feature", descriptor.feature()),
                            ("rows", count.as_str()),
                            ("target", target.as_str()),
                        ],
                    );
                    Verdict::evaluated(descriptor, target, evaluate(descriptor, &rows))
                }
                Err(e) => {
                    let error = e.to_string();
                    log_event_with_fields(
                        Event::TargetFailed,
                        &[
                            ("error", error.as_str()),
                            ("feature", descriptor.feature()),
                            ("target", target.as_str()),
                        ],
                    );
                    Verdict::execution_error(descriptor, target, &e)
                }
            };
            verdicts.push(verdict);
        }
    }

    fn ensure_targets(&self) -> PipelineResult<()> {
        if self.config.has_targets() {
            Ok(())
        } else {
            log_event(Event::RunAborted);
            Err(PipelineError::NoTargets)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{ExecutorError, ExecutorResult, Row, Value};
    use crate::generator::Runner;
    use std::cell::RefCell;

    /// Returns `n` rows for every query and records each call.
    struct Recording {
        rows: usize,
        calls: RefCell<Vec<String>>,
    }

    impl Recording {
        fn new(rows: usize) -> Self {
            Self {
                rows,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl DataSource for Recording {
        fn run_query(&self, _query: &str, target: &str) -> ExecutorResult<Vec<Row>> {
            self.calls.borrow_mut().push(target.to_string());
            Ok((0..self.rows).map(|i| vec![Value::Integer(i as i64)]).collect())
        }
    }

    fn config(targets: &[&str]) -> Config {
        Config {
            targets: targets.iter().map(|t| t.to_string()).collect(),
            use_llm: false,
            ..Config::default()
        }
    }

    #[test]
    fn test_no_targets_aborts_before_execution() {
        let config = config(&[]);
        let generator = Generator::heuristic();
        let source = Recording::new(1);
        let pipeline = Pipeline::new(&config, &generator, &source);

        assert!(matches!(
            pipeline.run("- login fix"),
            Err(PipelineError::NoTargets)
        ));
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn test_skipped_once_not_per_target() {
        let config = config(&["a", "b", "c"]);
        let generator = Generator::heuristic();
        let source = Recording::new(1);
        let pipeline = Pipeline::new(&config, &generator, &source);

        let descriptors = vec![
            TestDescriptor::manual("ui", "button visible"),
            TestDescriptor::new("purge", "DELETE FROM users", "no rows", Runner::Sql),
            TestDescriptor::new("empty", "", "no rows", Runner::Sql),
        ];
        let verdicts = pipeline.check_all(&descriptors).unwrap();

        assert_eq!(verdicts.len(), 3);
        assert!(verdicts.iter().all(Verdict::is_skipped));
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn test_targets_visited_in_order() {
        let config = config(&["a", "b", "c"]);
        let generator = Generator::heuristic();
        let source = Recording::new(2);
        let pipeline = Pipeline::new(&config, &generator, &source);

        let verdicts = pipeline.run("- login fix\n- dark mode").unwrap();

        assert_eq!(*source.calls.borrow(), vec!["a", "b", "c"]);
        let databases: Vec<_> = verdicts.iter().map(|v| v.database.as_str()).collect();
        assert_eq!(databases, vec!["a", "b", "c", NOT_APPLICABLE]);
        assert_eq!(verdicts[0].feature, "user authentication (a)");
    }

    #[test]
    fn test_execution_error_is_scoped_to_target() {
        struct FailsOn(&'static str);
        impl DataSource for FailsOn {
            fn run_query(&self, _q: &str, target: &str) -> ExecutorResult<Vec<Row>> {
                if target == self.0 {
                    Err(ExecutorError::execution_failed(target, "connection refused"))
                } else {
                    Ok(vec![vec![Value::Integer(1)]])
                }
            }
        }

        let config = config(&["a", "b"]);
        let generator = Generator::heuristic();
        let source = FailsOn("a");
        let pipeline = Pipeline::new(&config, &generator, &source);

        let verdicts = pipeline.run("- login fix").unwrap();
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0].outcome, Outcome::Error);
        assert!(verdicts[0].message.contains("connection refused"));
        assert_eq!(verdicts[1].outcome, Outcome::Passed);
    }

    #[test]
    fn test_empty_notes_yield_no_verdicts() {
        let config = config(&["a"]);
        let generator = Generator::heuristic();
        let source = Recording::new(1);
        let pipeline = Pipeline::new(&config, &generator, &source);

        assert!(pipeline.run("# Release 1.0\n\n## Notes\n").unwrap().is_empty());
    }
}
