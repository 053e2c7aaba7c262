//! Filter error types
//!
//! Error codes:
//! - KVQ_FILTER_UNKNOWN_FIELD (REJECT)
//! - KVQ_FILTER_TYPE_MISMATCH (REJECT)
//! - KVQ_FILTER_EMPTY_RANGE (REJECT)
//!
//! Malformed clauses are not errors: they are skipped and reported alongside the
//! built predicate.

use std::fmt;

use crate::schema::{SchemaError, SchemaErrorCode};

/// Severity levels for filter errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Filter rejected, user may try again
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Filter-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterErrorCode {
    /// Clause or key constraint names a field the schema does not declare
    KvqFilterUnknownField,
    /// Literal cannot be coerced to the field's declared type
    KvqFilterTypeMismatch,
    /// Range constraint with neither bound
    KvqFilterEmptyRange,
}

impl FilterErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            FilterErrorCode::KvqFilterUnknownField => "KVQ_FILTER_UNKNOWN_FIELD",
            FilterErrorCode::KvqFilterTypeMismatch => "KVQ_FILTER_TYPE_MISMATCH",
            FilterErrorCode::KvqFilterEmptyRange => "KVQ_FILTER_EMPTY_RANGE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for FilterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Filter error type with full context
#[derive(Debug, Clone)]
pub struct FilterError {
    code: FilterErrorCode,
    message: String,
    field: Option<String>,
    clause: Option<String>,
}

impl FilterError {
    /// Create an unknown field error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: FilterErrorCode::KvqFilterUnknownField,
            message: format!("Cannot filter on unknown field '{}'", f),
            field: Some(f),
            clause: None,
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: FilterErrorCode::KvqFilterTypeMismatch,
            message: reason.into(),
            field: Some(field.into()),
            clause: None,
        }
    }

    /// Create an empty range error
    pub fn empty_range(field: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: FilterErrorCode::KvqFilterEmptyRange,
            message: format!("Range constraint on '{}' needs a lower or upper bound", f),
            field: Some(f),
            clause: None,
        }
    }

    /// Attaches the clause text the error came from
    pub fn in_clause(mut self, clause: impl Into<String>) -> Self {
        self.clause = Some(clause.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> FilterErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the offending clause if applicable
    pub fn clause(&self) -> Option<&str> {
        self.clause.as_deref()
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(clause) = &self.clause {
            write!(f, " (in clause '{}')", clause)?;
        }
        Ok(())
    }
}

impl std::error::Error for FilterError {}

impl From<SchemaError> for FilterError {
    fn from(err: SchemaError) -> Self {
        let field = err.field().unwrap_or_default().to_string();
        match err.code() {
            SchemaErrorCode::KvqUnknownField => Self::unknown_field(field),
            _ => Self::type_mismatch(field, err.message()),
        }
    }
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
