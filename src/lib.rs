//! kvquery - attribute-filter queries over a partitioned key-value table
//!
//! A query is a key constraint plus a free-form filter expression. It is paged
//! through the store to completion, sorted, projected to display fields, shown as
//! a table and optionally exported to CSV.

pub mod backend;
pub mod cli;
pub mod executor;
pub mod filter;
pub mod format;
pub mod ingest;
pub mod observability;
pub mod pipeline;
pub mod schema;
pub mod store;
