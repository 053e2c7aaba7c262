//! Session counters
//!
//! Counters only, monotonic, reset on process start.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for one process lifetime
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    queries_executed: AtomicU64,
    queries_rejected: AtomicU64,
    queries_interrupted: AtomicU64,
    pages_fetched: AtomicU64,
    records_returned: AtomicU64,
    clauses_skipped: AtomicU64,
    exports_written: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_interrupted(&self) {
        self.queries_interrupted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_pages(&self, pages: u64) {
        self.pages_fetched.fetch_add(pages, Ordering::Relaxed);
    }

    pub fn add_records(&self, records: u64) {
        self.records_returned.fetch_add(records, Ordering::Relaxed);
    }

    pub fn add_clauses_skipped(&self, clauses: u64) {
        self.clauses_skipped.fetch_add(clauses, Ordering::Relaxed);
    }

    pub fn increment_exports(&self) {
        self.exports_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            queries_interrupted: self.queries_interrupted.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            records_returned: self.records_returned.load(Ordering::Relaxed),
            clauses_skipped: self.clauses_skipped.load(Ordering::Relaxed),
            exports_written: self.exports_written.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_rejected: u64,
    pub queries_interrupted: u64,
    pub pages_fetched: u64,
    pub records_returned: u64,
    pub clauses_skipped: u64,
    pub exports_written: u64,
}
