//! Observability for relcheck runs
//!
//! Structured JSON logging and typed lifecycle events. Observability is
//! read-only: it never changes the verdicts a run produces.
//!
//! ```ignore
//! use relcheck::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::NotesExtracted, &[("count", "4")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
