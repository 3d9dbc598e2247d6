//! Observable pipeline events
//!
//! Events are explicit and typed. One event maps to one log line.

use std::fmt;

use super::logger::Severity;

/// Observable events during a release-check run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Run lifecycle
    /// Run started
    RunStart,
    /// Run finished, all verdicts produced
    RunComplete,
    /// Run aborted before execution (no targets)
    RunAborted,

    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Extraction
    /// Statements extracted from release notes
    NotesExtracted,

    // Generation
    /// Descriptor generation begins
    GenerationStart,
    /// Descriptor generation complete
    GenerationComplete,
    /// Generative backend unavailable, rule engine used instead
    GenerationFallback,

    // Execution
    /// Descriptor routed to a skipped verdict
    DescriptorSkipped,
    /// Query executed against one target
    TargetExecuted,
    /// Query failed against one target
    TargetFailed,

    // Reporting
    /// Report artifacts written
    ReportsWritten,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RunStart => "RUN_BEGIN",
            Event::RunComplete => "RUN_COMPLETE",
            Event::RunAborted => "RUN_ABORTED",

            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::NotesExtracted => "NOTES_EXTRACTED",

            Event::GenerationStart => "GENERATION_BEGIN",
            Event::GenerationComplete => "GENERATION_COMPLETE",
            Event::GenerationFallback => "GENERATION_FALLBACK",

            Event::DescriptorSkipped => "DESCRIPTOR_SKIPPED",
            Event::TargetExecuted => "TARGET_EXECUTED",
            Event::TargetFailed => "TARGET_FAILED",

            Event::ReportsWritten => "REPORTS_WRITTEN",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::RunAborted => Severity::Error,
            Event::GenerationFallback | Event::TargetFailed => Severity::Warn,
            Event::TargetExecuted | Event::DescriptorSkipped => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
