//! Query Executor subsystem for kvquery
//!
//! Drains a paginated table scan into one result and orders it.
//!
//! # Execution Flow (strict order)
//!
//! 1. Reject unknown fields and mistyped literals before any store call
//! 2. Scan with the predicate and projection, following continuation tokens
//! 3. Accumulate every page's records in page order
//! 4. Sort the accumulated records, if requested
//!
//! # Guarantees
//!
//! - Every matching record is returned exactly once, whatever the page size
//! - Pages already fetched survive a later store failure
//! - No retries; retry belongs to the transport

mod errors;
mod executor;
mod result;
mod sorter;

pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult, Severity};
pub use executor::{QueryExecutor, DEFAULT_MAX_PAGES};
pub use result::{Interruption, InterruptionKind, QueryResult};
pub use sorter::{ResultSorter, SortDirection, SortSpec};
