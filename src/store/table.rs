//! Backing table contract
//!
//! A scan takes a predicate, an optional projection and an optional exclusive start
//! key, and returns one bounded page plus a continuation token when more items
//! remain. Callers loop until no token comes back.

use serde::{Deserialize, Serialize};

use super::errors::StoreResult;
use crate::filter::Predicate;
use crate::schema::{FieldDef, Record, RecordKey};

/// Opaque marker for resuming a scan after the last evaluated item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationToken(RecordKey);

impl ContinuationToken {
    pub fn new(key: RecordKey) -> Self {
        Self(key)
    }

    /// The last key evaluated by the page that produced this token
    pub fn key(&self) -> &RecordKey {
        &self.0
    }
}

/// Parameters for one scan call
#[derive(Debug, Clone, Copy)]
pub struct ScanRequest<'a> {
    pub predicate: &'a Predicate,
    /// Fields to return; `None` returns every field
    pub projection: Option<&'a [String]>,
    pub exclusive_start_key: Option<&'a ContinuationToken>,
}

impl<'a> ScanRequest<'a> {
    pub fn new(predicate: &'a Predicate) -> Self {
        Self {
            predicate,
            projection: None,
            exclusive_start_key: None,
        }
    }

    pub fn with_projection(mut self, projection: Option<&'a [String]>) -> Self {
        self.projection = projection;
        self
    }

    pub fn starting_after(mut self, token: Option<&'a ContinuationToken>) -> Self {
        self.exclusive_start_key = token;
        self
    }
}

/// One page of scan results
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    /// Matching items, in key order. May be empty even when more pages follow.
    pub records: Vec<Record>,
    pub continuation: Option<ContinuationToken>,
}

/// Table metadata as reported by describe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDescription {
    pub table_name: String,
    pub partition_key: FieldDef,
    pub sort_key: FieldDef,
    pub item_count: usize,
    pub page_size: usize,
}

/// Operations the query engine needs from a backing table
pub trait TableStore {
    /// Returns true if the table has been created
    fn exists(&self) -> StoreResult<bool>;

    /// Describes the table; fails with `TableNotFound` if it was never created
    fn describe(&self) -> StoreResult<TableDescription>;

    /// Creates the table; fails with `TableExists` if already present
    fn create(&mut self) -> StoreResult<()>;

    /// Inserts or replaces one item by key
    fn put(&mut self, record: Record) -> StoreResult<()>;

    /// Persists buffered writes
    fn flush(&mut self) -> StoreResult<()> {
        Ok(())
    }

    /// Returns one page of matching items
    fn scan(&mut self, request: &ScanRequest<'_>) -> StoreResult<ScanPage>;
}
