//! Generative fallback
//!
//! A backend turns a whole batch of statements into descriptors in one
//! call. The output length is unrelated to the input length, so results
//! are never zipped back onto statements.
//!
//! The batch is all-or-nothing: one malformed entry discards the response.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::extractor::Statement;

use super::descriptor::{Runner, TestDescriptor};
use super::errors::GenerationResult;

/// Feature label for entries the backend left unnamed.
pub const UNNAMED_FEATURE: &str = "Unnamed feature";

/// System message sent alongside the prompt.
pub const SYSTEM_MESSAGE: &str = "You write strict, valid JSON only.";

const PROMPT_HEADER: &str = "\
You are a QA assistant. Convert each release note into a structured test case.
For SQL-related notes, generate a read-only SQLite SELECT query.
For workflow notes, describe the action and expectation.
Return a strict JSON array where each item has:
  - feature: short name
  - query: a SQL string OR an empty string if not SQL
  - expectation: textual expectation (e.g., 'should not appear', 'only include')
  - runner: 'sql' or 'manual'

Example output:
[{\"feature\":\"activationDate filter\",\"query\":\"SELECT * FROM clients WHERE activationDate >= '2025-01-01';\",\"expectation\":\"Only include clients with activationDate >= 2025-01-01\",\"runner\":\"sql\"}]

Release notes:
";

/// A service that converts a batch of statements into descriptors.
pub trait GenerativeBackend {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Generate descriptors for the whole batch, or fail as a unit
    fn generate_batch(&self, statements: &[Statement]) -> GenerationResult<Vec<TestDescriptor>>;
}

/// Render the fixed instruction template for a batch.
pub fn render_prompt(statements: &[Statement]) -> String {
    let mut prompt = String::from(PROMPT_HEADER);
    for (i, statement) in statements.iter().enumerate() {
        if i > 0 {
            prompt.push('\n');
        }
        prompt.push_str("- ");
        prompt.push_str(statement.text());
    }
    prompt.push('\n');
    prompt
}

#[derive(Debug, Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    feature: Option<String>,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    expectation: Option<String>,
    /// `None` only when the key is absent; an explicit `null` is kept.
    #[serde(default, deserialize_with = "present")]
    runner: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RawDescriptor {
    fn normalize(self) -> TestDescriptor {
        let feature = self
            .feature
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| UNNAMED_FEATURE.to_string());
        let query = self.query.unwrap_or_default();
        // A missing runner is inferred from the query, which may promote an
        // entry the model meant as manual.
        let runner = match self.runner {
            Some(Value::String(tag)) => Runner::from_tag(&tag),
            Some(_) => Runner::Manual,
            None if !query.is_empty() => Runner::Sql,
            None => Runner::Manual,
        };
        TestDescriptor::new(feature, query, self.expectation.unwrap_or_default(), runner)
    }
}

/// Parse and normalize a backend response body.
///
/// The content must be a JSON array of objects; anything else fails the
/// whole batch.
pub fn parse_descriptors(content: &str) -> GenerationResult<Vec<TestDescriptor>> {
    let raw: Vec<RawDescriptor> = serde_json::from_str(content.trim())?;
    Ok(raw.into_iter().map(RawDescriptor::normalize).collect())
}
