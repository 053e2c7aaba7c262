//! Table creation and population from the source data set
//!
//! # Design Principles
//!
//! 1. Creation is idempotent: an existing table is reported, never recreated
//! 2. Values are encoded per backend; sort keys are escaped where the backend needs it
//! 3. Bad entries are counted and skipped; store outages abort the run

mod errors;
mod loader;

pub use errors::{IngestError, IngestResult};
pub use loader::{ensure_table, IngestReport, MovieLoader};
