//! Observable events
//!
//! Every log line the tool emits names one of these events.

use std::fmt;

/// Observable events in kvquery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration file loaded and validated
    ConfigLoaded,
    /// Interactive session ended by the user
    SessionEnd,

    // Table management
    /// Table did not exist and was created
    TableCreated,
    /// Table creation skipped, table already present
    TableExists,
    /// Table populated from the source data set
    TablePopulated,

    // Query processing
    /// Query execution started
    QueryBegin,
    /// One store page received
    QueryPage,
    /// Every page fetched
    QueryComplete,
    /// Pagination stopped early, partial result kept
    QueryInterrupted,
    /// Query rejected before or by the store
    QueryRejected,
    /// Malformed filter clause ignored
    ClauseSkipped,

    // Output
    /// Export file written
    ExportWritten,
    /// Export requested but not written, results kept
    ExportFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SessionEnd => "SESSION_END",
            Event::TableCreated => "TABLE_CREATED",
            Event::TableExists => "TABLE_EXISTS",
            Event::TablePopulated => "TABLE_POPULATED",
            Event::QueryBegin => "QUERY_BEGIN",
            Event::QueryPage => "QUERY_PAGE",
            Event::QueryComplete => "QUERY_COMPLETE",
            Event::QueryInterrupted => "QUERY_INTERRUPTED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::ClauseSkipped => "CLAUSE_SKIPPED",
            Event::ExportWritten => "EXPORT_WRITTEN",
            Event::ExportFailed => "EXPORT_FAILED",
        }
    }

    /// Returns true if this event indicates a degraded outcome
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::QueryInterrupted
                | Event::QueryRejected
                | Event::ClauseSkipped
                | Event::ExportFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
