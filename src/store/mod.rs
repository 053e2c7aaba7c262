//! Table store subsystem for kvquery
//!
//! Defines the contract the query engine consumes from a backing table and a
//! file-backed implementation of it.
//!
//! # Design Principles
//!
//! 1. Stores are constructed explicitly and handed to the executor; no globals
//! 2. Scans are paged with an exclusive start key, in key order
//! 3. Stores validate predicates and projections before scanning
//! 4. Persistence failures surface as errors, never as silent data loss

mod errors;
mod local;
mod table;

pub use errors::{StoreError, StoreResult};
pub use local::{LocalTable, DEFAULT_PAGE_SIZE};
pub use table::{ContinuationToken, ScanPage, ScanRequest, TableDescription, TableStore};
