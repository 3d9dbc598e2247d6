//! Pipeline End-to-End Tests
//!
//! Full runs from release-note text to verdicts, with in-memory data
//! sources and generative backends:
//! - Heuristic generation against scripted targets
//! - Multi-target fan-out with a failing target
//! - Skipped descriptors produce one verdict, never a data-source call
//! - Generative fallback is all-or-nothing

use std::cell::RefCell;

use relcheck::config::Config;
use relcheck::executor::{DataSource, ExecutorError, ExecutorResult, Row, Value};
use relcheck::generator::{
    parse_descriptors, GenerationError, GenerationResult, GenerativeBackend, Generator,
    TestDescriptor,
};
use relcheck::extractor::Statement;
use relcheck::pipeline::{Outcome, Pipeline, PipelineError, Verdict, NOT_APPLICABLE, SKIP_MESSAGE};

// =============================================================================
// Helpers
// =============================================================================

/// Row counts keyed by a fragment of the query text; every call recorded.
struct Scripted {
    responses: Vec<(&'static str, usize)>,
    failing_target: Option<&'static str>,
    calls: RefCell<Vec<(String, String)>>,
}

impl Scripted {
    fn new(responses: Vec<(&'static str, usize)>) -> Self {
        Self {
            responses,
            failing_target: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn failing_on(mut self, target: &'static str) -> Self {
        self.failing_target = Some(target);
        self
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl DataSource for Scripted {
    fn run_query(&self, query: &str, target: &str) -> ExecutorResult<Vec<Row>> {
        self.calls
            .borrow_mut()
            .push((query.to_string(), target.to_string()));

        if self.failing_target == Some(target) {
            return Err(ExecutorError::execution_failed(
                target,
                "Can't connect to server on 'db-2'",
            ));
        }

        let n = self
            .responses
            .iter()
            .find(|(fragment, _)| query.contains(fragment))
            .map(|(_, n)| *n)
            .unwrap_or(0);
        Ok((0..n).map(|i| vec![Value::Integer(i as i64 + 1)]).collect())
    }
}

struct FixedBackend(&'static str);

impl GenerativeBackend for FixedBackend {
    fn name(&self) -> &str {
        "fixed"
    }

    fn generate_batch(&self, _: &[Statement]) -> GenerationResult<Vec<TestDescriptor>> {
        parse_descriptors(self.0)
    }
}

struct DownBackend;

impl GenerativeBackend for DownBackend {
    fn name(&self) -> &str {
        "down"
    }

    fn generate_batch(&self, _: &[Statement]) -> GenerationResult<Vec<TestDescriptor>> {
        Err(GenerationError::Status {
            status: 503,
            body: "overloaded".to_string(),
        })
    }
}

fn config(targets: &[&str]) -> Config {
    Config {
        targets: targets.iter().map(|t| t.to_string()).collect(),
        use_llm: false,
        ..Config::default()
    }
}

fn run(config: &Config, generator: &Generator, source: &Scripted, text: &str) -> Vec<Verdict> {
    Pipeline::new(config, generator, source).run(text).unwrap()
}

// =============================================================================
// Heuristic Runs
// =============================================================================

/// Authentication passes with 5 rows; disenrollment fails with 0.
#[test]
fn test_release_notes_example() {
    let config = config(&["db1"]);
    let generator = Generator::heuristic();
    let source = Scripted::new(vec![("FROM users", 5), ("FROM members", 0)]);

    let verdicts = run(
        &config,
        &generator,
        &source,
        "- authentication improvements\n- fixed disenrollment bug",
    );

    assert_eq!(verdicts.len(), 2);

    assert!(verdicts[0].passed);
    assert_eq!(verdicts[0].feature, "user authentication (db1)");
    assert!(verdicts[0].message.starts_with("Found 5 recently active users"));

    assert!(!verdicts[1].passed);
    assert_eq!(verdicts[1].feature, "pending disenrollment visibility (db1)");
    assert!(verdicts[1].message.starts_with("Found 0 active members"));
    assert_eq!(verdicts[1].outcome, Outcome::Failed);
}

/// Headings and blanks only: nothing to check, nothing executed.
#[test]
fn test_heading_only_notes_yield_no_verdicts() {
    let config = config(&["db1"]);
    let generator = Generator::heuristic();
    let source = Scripted::new(vec![]);

    let verdicts = run(&config, &generator, &source, "# Release 3.1\n\n## Changes\n   \n");

    assert!(verdicts.is_empty());
    assert_eq!(source.call_count(), 0);
}

/// Unmatched statements are skipped once, regardless of target count.
#[test]
fn test_manual_descriptor_skipped_once() {
    let config = config(&["db1", "db2", "db3"]);
    let generator = Generator::heuristic();
    let source = Scripted::new(vec![]);

    let verdicts = run(&config, &generator, &source, "- new onboarding wizard");

    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].outcome, Outcome::Skipped);
    assert_eq!(verdicts[0].database, NOT_APPLICABLE);
    assert_eq!(verdicts[0].message, SKIP_MESSAGE);
    assert!(!verdicts[0].passed);
    assert_eq!(source.call_count(), 0);
}

// =============================================================================
// Multi-Target Fan-Out
// =============================================================================

/// Target 2 fails; targets 1 and 3 are still evaluated.
#[test]
fn test_failing_target_does_not_abort_siblings() {
    let config = config(&["db1", "db2", "db3"]);
    let generator = Generator::heuristic();
    let source = Scripted::new(vec![("FROM users", 2)]).failing_on("db2");

    let verdicts = run(&config, &generator, &source, "- login page refresh");

    assert_eq!(verdicts.len(), 3);
    assert!(verdicts[0].passed);
    assert_eq!(verdicts[0].database, "db1");

    assert!(!verdicts[1].passed);
    assert_eq!(verdicts[1].database, "db2");
    assert_eq!(verdicts[1].outcome, Outcome::Error);
    assert!(verdicts[1].message.contains("Can't connect to server"));

    assert!(verdicts[2].passed);
    assert_eq!(verdicts[2].database, "db3");
}

/// Descriptors in generation order, targets in configured order.
#[test]
fn test_visit_order() {
    let config = config(&["b", "a"]);
    let generator = Generator::heuristic();
    let source = Scripted::new(vec![("FROM users", 1), ("FROM members", 1)]);

    run(
        &config,
        &generator,
        &source,
        "- password rules\n- disenrollment cleanup",
    );

    let calls = source.calls.borrow();
    let order: Vec<(bool, &str)> = calls
        .iter()
        .map(|(q, t)| (q.contains("FROM users"), t.as_str()))
        .collect();
    assert_eq!(order, vec![(true, "b"), (true, "a"), (false, "b"), (false, "a")]);
}

/// No targets: configuration error before any data-source call.
#[test]
fn test_no_targets_is_configuration_error() {
    let config = config(&[]);
    let generator = Generator::heuristic();
    let source = Scripted::new(vec![]);

    let result = Pipeline::new(&config, &generator, &source).run("- login");

    assert!(matches!(result, Err(PipelineError::NoTargets)));
    assert_eq!(source.call_count(), 0);
}

// =============================================================================
// Generative Fallback
// =============================================================================

/// Backend output replaces the rule engine and need not match input length.
#[test]
fn test_backend_descriptors_are_executed() {
    let config = config(&["db1"]);
    let generator = Generator::with_backend(Box::new(FixedBackend(
        r#"[
            {"feature":"stale sessions","query":"SELECT id FROM sessions WHERE expired = 1","expectation":"should not appear","runner":"sql"},
            {"feature":"audit","query":"SELECT id FROM audit","expectation":"recorded"},
            {"feature":"ui tweak","expectation":"looks right"}
        ]"#,
    )));
    let source = Scripted::new(vec![("FROM sessions", 0), ("FROM audit", 3)]);

    let verdicts = run(&config, &generator, &source, "- session cleanup");

    assert_eq!(verdicts.len(), 3);
    assert!(verdicts[0].passed);
    assert_eq!(verdicts[0].message, "Expected 0 rows, got 0");
    // Runner inferred from the query
    assert!(verdicts[1].passed);
    assert_eq!(verdicts[1].message, "No strict rule matched; rows=3");
    assert_eq!(verdicts[2].outcome, Outcome::Skipped);
}

/// Null and non-lowercase runner tags are skipped, never executed.
#[test]
fn test_backend_runner_tags_are_exact() {
    let config = config(&["db1"]);
    let generator = Generator::with_backend(Box::new(FixedBackend(
        r#"[
            {"feature":"null runner","query":"SELECT id FROM users","expectation":"x","runner":null},
            {"feature":"upper runner","query":"SELECT id FROM users","expectation":"x","runner":"SQL"}
        ]"#,
    )));
    let source = Scripted::new(vec![("FROM users", 1)]);

    let verdicts = run(&config, &generator, &source, "- login fix");

    assert_eq!(verdicts.len(), 2);
    assert!(verdicts.iter().all(Verdict::is_skipped));
    assert_eq!(source.call_count(), 0);
}

/// A malformed response discards the whole batch.
#[test]
fn test_malformed_backend_response_falls_back() {
    let config = config(&["db1"]);
    let generator = Generator::with_backend(Box::new(FixedBackend(
        r#"[{"feature":"ok","query":"SELECT 1"}, "not an object"]"#,
    )));
    let source = Scripted::new(vec![("FROM users", 1)]);

    let verdicts = run(&config, &generator, &source, "- login fix\n- dark mode");

    assert_eq!(verdicts.len(), 2);
    assert_eq!(verdicts[0].feature, "user authentication (db1)");
    assert_eq!(verdicts[1].outcome, Outcome::Skipped);
}

/// An unavailable backend yields exactly the heuristic result.
#[test]
fn test_unavailable_backend_matches_heuristic() {
    let config = config(&["db1"]);
    let notes = "- authentication improvements\n- search performance tuning\n- misc";

    let fallback = run(
        &config,
        &Generator::with_backend(Box::new(DownBackend)),
        &Scripted::new(vec![("FROM users", 1)]),
        notes,
    );
    let heuristic = run(
        &config,
        &Generator::heuristic(),
        &Scripted::new(vec![("FROM users", 1)]),
        notes,
    );

    assert_eq!(fallback, heuristic);
}
