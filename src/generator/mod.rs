//! Test descriptor generation
//!
//! Two strategies produce descriptors from statements:
//!
//! - the rule engine: one descriptor per statement, never fails
//! - a generative backend: one call for the whole batch, any failure
//!   falls back to the rule engine for every statement
//!
//! Which one runs is decided by configuration when the `Generator` is built.

mod descriptor;
mod errors;
mod generative;
mod openai;
mod rules;

pub use descriptor::{Runner, TestDescriptor};
pub use errors::{GenerationError, GenerationResult};
pub use generative::{parse_descriptors, render_prompt, GenerativeBackend, UNNAMED_FEATURE};
pub use openai::OpenAiBackend;
pub use rules::{feature_label, Keywords, Rule, RuleEngine, MANUAL_EXPECTATION, RULES};

use crate::config::Config;
use crate::extractor::Statement;
use crate::observability::{log_event_with_fields, Event};

/// Produces descriptors for a batch of statements.
pub struct Generator {
    rules: RuleEngine,
    backend: Option<Box<dyn GenerativeBackend>>,
}

impl Generator {
    /// Rule engine only
    pub fn heuristic() -> Self {
        Self {
            rules: RuleEngine::new(),
            backend: None,
        }
    }

    /// Try the backend first, rule engine on failure
    pub fn with_backend(backend: Box<dyn GenerativeBackend>) -> Self {
        Self {
            rules: RuleEngine::new(),
            backend: Some(backend),
        }
    }

    /// Build from configuration
    ///
    /// With `use_llm` off the backend is never constructed. Missing
    /// credentials are reported by the backend at call time and trigger
    /// the same fallback as any other failure.
    pub fn from_config(config: &Config) -> Self {
        if config.use_llm {
            Self::with_backend(Box::new(OpenAiBackend::new(config.openai.clone())))
        } else {
            Self::heuristic()
        }
    }

    /// Whether a generative backend is configured
    pub fn uses_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Generate descriptors for the batch. Never fails.
    pub fn generate(&self, statements: &[Statement]) -> Vec<TestDescriptor> {
        let count = statements.len().to_string();
        log_event_with_fields(Event::GenerationStart, &[("statements", count.as_str())]);

        let (descriptors, strategy) = match &self.backend {
            // Nothing to describe; do not ask a model to invent checks
            _ if statements.is_empty() => (Vec::new(), "none"),
            None => (self.rules.generate_all(statements), "rules"),
            Some(backend) => match backend.generate_batch(statements) {
                Ok(descriptors) => (descriptors, backend.name()),
                Err(e) => {
                    let error = e.to_string();
                    log_event_with_fields(
                        Event::GenerationFallback,
                        &[("backend", backend.name()), ("error", error.as_str())],
                    );
                    (self.rules.generate_all(statements), "rules")
                }
            },
        };

        let produced = descriptors.len().to_string();
        log_event_with_fields(
            Event::GenerationComplete,
            &[("descriptors", produced.as_str()), ("strategy", strategy)],
        );

        descriptors
    }
}
