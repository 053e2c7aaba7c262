//! # Store Errors

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by a backing table
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    // Table errors
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table already exists: {0}")]
    TableExists(String),

    // Request errors
    /// Request parameters the store refuses (bad field, bad literal type, bad item)
    #[error("Validation failed: {0}")]
    Validation(String),

    // Communication errors
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Request throttled: {0}")]
    Throttled(String),

    // Persistence errors
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Corrupt table data: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Validation failures are the caller's fault and will fail again if retried
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    /// Errors that might succeed on a later attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Throttled(_))
    }

    /// Short machine-readable kind, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::TableNotFound(_) => "table_not_found",
            StoreError::TableExists(_) => "table_exists",
            StoreError::Validation(_) => "validation",
            StoreError::Unavailable(_) => "unavailable",
            StoreError::Throttled(_) => "throttled",
            StoreError::Io(_) => "io",
            StoreError::Corrupt(_) => "corrupt",
        }
    }
}

impl From<SchemaError> for StoreError {
    fn from(err: SchemaError) -> Self {
        StoreError::Validation(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}
