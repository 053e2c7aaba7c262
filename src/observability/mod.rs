//! Observability subsystem for kvquery
//!
//! Provides:
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Session counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on query results
//! 3. No background threads
//! 4. Logging failures are swallowed, never surfaced to the caller
//!
//! # Usage
//!
//! ```ignore
//! use kvquery::observability::{log_event, Event, MetricsRegistry};
//!
//! log_event(Event::QueryComplete, &[("records", "42")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_queries_executed();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Severity an event is logged at
pub fn event_severity(event: Event) -> Severity {
    match event {
        Event::QueryPage => Severity::Trace,
        e if e.is_warning() => Severity::Warn,
        _ => Severity::Info,
    }
}

/// Log a lifecycle event with fields
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}
