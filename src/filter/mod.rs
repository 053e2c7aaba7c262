//! Filter subsystem for kvquery
//!
//! Turns key constraints and free-form attribute expressions into a predicate tree
//! and evaluates that tree against records.
//!
//! # Design Principles
//!
//! 1. Operators are whole whitespace-delimited tokens, never substrings
//! 2. Every literal is coerced to its field's declared type at build time
//! 3. Malformed clauses are skipped and reported; unknown fields are rejected
//! 4. The empty predicate matches every record
//!
//! # Expression Grammar
//!
//! ```text
//! expression := clause ("and" clause)*
//! clause     := field op literal
//! op         := eq | = | == | ne | != | <> | gt | > | ge | gte | >=
//!             | lt | < | le | lte | <=
//! literal    := word+ | 'quoted' | "quoted"
//! ```

mod ast;
mod builder;
mod errors;
mod eval;
mod lexer;

pub use ast::{CompareOp, Comparison, Predicate};
pub use builder::{BuiltFilter, FilterBuilder, KeyConstraint, KeyRange, SkippedClause};
pub use errors::{FilterError, FilterErrorCode, FilterResult, Severity};
pub use eval::PredicateFilter;
pub use lexer::{tokenize, Token};
