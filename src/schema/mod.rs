//! Attribute schema for kvquery
//!
//! The schema is the single source of truth for which fields exist, which of them form
//! the composite key, and how literals and stored values are coerced for comparison.
//!
//! # Design Principles
//!
//! - Every field named by a filter, sort, or projection is checked here first
//! - Unknown names fail fast instead of reading as empty
//! - Literals are coerced once, when the filter is built

mod errors;
mod escape;
mod loader;
mod record;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use escape::{escape_key, needs_escape, unescape_key};
pub use loader::SchemaLoader;
pub use record::{KeyValue, Record, RecordKey};
pub use types::{FieldDef, FieldRole, FieldType, Scalar, Schema};
