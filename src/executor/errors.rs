//! Executor error types
//!
//! Error codes:
//! - KVQ_QUERY_REJECTED (REJECT)
//! - KVQ_STORE_FAILED (ERROR)
//!
//! A store failure after at least one page is not an error: the executor returns
//! the pages it has, marked as interrupted.

use std::fmt;

use crate::schema::SchemaError;
use crate::store::StoreError;

/// Severity levels for executor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query refused, nothing was fetched
    Reject,
    /// Store could not be reached, nothing was fetched
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// Predicate or projection failed validation
    KvqQueryRejected,
    /// Store communication failed on the first page
    KvqStoreFailed,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::KvqQueryRejected => "KVQ_QUERY_REJECTED",
            ExecutorErrorCode::KvqStoreFailed => "KVQ_STORE_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ExecutorErrorCode::KvqQueryRejected => Severity::Reject,
            ExecutorErrorCode::KvqStoreFailed => Severity::Error,
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with full context
#[derive(Debug, Clone)]
pub struct ExecutorError {
    /// Error code
    code: ExecutorErrorCode,
    /// Human-readable message
    message: String,
    /// Underlying store error, when the store reported it
    store_error: Option<StoreError>,
}

impl ExecutorError {
    /// Create a rejection for a request that failed local validation
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::KvqQueryRejected,
            message: reason.into(),
            store_error: None,
        }
    }

    /// Create an error from a store failure. Store-side validation failures map to
    /// `KVQ_QUERY_REJECTED`, everything else to `KVQ_STORE_FAILED`.
    pub fn from_store(err: StoreError) -> Self {
        let code = if err.is_validation() {
            ExecutorErrorCode::KvqQueryRejected
        } else {
            ExecutorErrorCode::KvqStoreFailed
        };
        Self {
            code,
            message: err.to_string(),
            store_error: Some(err),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
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

    /// Returns the store error, if any
    pub fn store_error(&self) -> Option<&StoreError> {
        self.store_error.as_ref()
    }

    /// Returns true if the query itself was at fault
    pub fn is_rejection(&self) -> bool {
        self.code == ExecutorErrorCode::KvqQueryRejected
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for ExecutorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.store_error
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<SchemaError> for ExecutorError {
    fn from(err: SchemaError) -> Self {
        Self::rejected(err.to_string())
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
