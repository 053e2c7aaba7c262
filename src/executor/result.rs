//! Result types for query execution

use serde::Serialize;
use uuid::Uuid;

use crate::schema::Record;

/// Why pagination stopped before the store ran out of pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptionKind {
    /// Store failed after at least one page
    StoreError,
    /// Page cap reached
    PageLimit,
}

/// Details of an early stop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interruption {
    pub kind: InterruptionKind,
    pub reason: String,
    /// Pages accumulated before the stop
    pub pages_fetched: usize,
}

/// Records returned by one query. Built once by the executor, read-only afterwards.
#[derive(Debug, Clone)]
pub struct QueryResult {
    query_id: Uuid,
    records: Vec<Record>,
    pages_fetched: usize,
    interruption: Option<Interruption>,
}

impl QueryResult {
    pub(crate) fn new(
        query_id: Uuid,
        records: Vec<Record>,
        pages_fetched: usize,
        interruption: Option<Interruption>,
    ) -> Self {
        Self {
            query_id,
            records,
            pages_fetched,
            interruption,
        }
    }

    /// Correlates log lines for this query
    pub fn query_id(&self) -> Uuid {
        self.query_id
    }

    /// Records in page order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn interruption(&self) -> Option<&Interruption> {
        self.interruption.as_ref()
    }

    /// True when every page was fetched
    pub fn is_complete(&self) -> bool {
        self.interruption.is_none()
    }

    /// Consumes the result, yielding its records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
