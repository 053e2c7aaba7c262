//! Schema error types
//!
//! Error codes:
//! - KVQ_UNKNOWN_FIELD (REJECT)
//! - KVQ_TYPE_MISMATCH (REJECT)
//! - KVQ_MISSING_KEY (REJECT)
//! - KVQ_MALFORMED_SCHEMA (FATAL)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, session continues
    Reject,
    /// Schema itself is unusable, the tool cannot start
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Field name is not declared by the schema
    KvqUnknownField,
    /// Literal or stored value cannot be coerced to the declared type
    KvqTypeMismatch,
    /// Record lacks one of its key fields
    KvqMissingKey,
    /// Schema file is unreadable or structurally invalid
    KvqMalformedSchema,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::KvqUnknownField => "KVQ_UNKNOWN_FIELD",
            SchemaErrorCode::KvqTypeMismatch => "KVQ_TYPE_MISMATCH",
            SchemaErrorCode::KvqMissingKey => "KVQ_MISSING_KEY",
            SchemaErrorCode::KvqMalformedSchema => "KVQ_MALFORMED_SCHEMA",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::KvqMalformedSchema => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    field: Option<String>,
}

impl SchemaError {
    /// Create an unknown field error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: SchemaErrorCode::KvqUnknownField,
            message: format!("Field '{}' is not part of the schema", f),
            field: Some(f),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: &str,
        actual: impl fmt::Display,
    ) -> Self {
        let f = field.into();
        Self {
            code: SchemaErrorCode::KvqTypeMismatch,
            message: format!("Field '{}' expects {}, got '{}'", f, expected, actual),
            field: Some(f),
        }
    }

    /// Create a missing key error
    pub fn missing_key(field: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: SchemaErrorCode::KvqMissingKey,
            message: format!("Record is missing key field '{}'", f),
            field: Some(f),
        }
    }

    /// Create an error for a malformed schema file
    pub fn malformed_schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::KvqMalformedSchema,
            message: format!("Malformed schema '{}': {}", path.into(), reason.into()),
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
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

    /// Returns the offending field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
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

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::KvqUnknownField.code(), "KVQ_UNKNOWN_FIELD");
        assert_eq!(SchemaErrorCode::KvqTypeMismatch.code(), "KVQ_TYPE_MISMATCH");
        assert_eq!(SchemaErrorCode::KvqMissingKey.code(), "KVQ_MISSING_KEY");
        assert_eq!(
            SchemaErrorCode::KvqMalformedSchema.code(),
            "KVQ_MALFORMED_SCHEMA"
        );
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(SchemaErrorCode::KvqUnknownField.severity(), Severity::Reject);
        assert_eq!(SchemaErrorCode::KvqTypeMismatch.severity(), Severity::Reject);
        assert_eq!(SchemaErrorCode::KvqMalformedSchema.severity(), Severity::Fatal);
    }

    #[test]
    fn test_unknown_field_carries_name() {
        let err = SchemaError::unknown_field("budget");
        assert_eq!(err.field(), Some("budget"));
        assert!(!err.is_fatal());

        let display = err.to_string();
        assert!(display.contains("REJECT"));
        assert!(display.contains("KVQ_UNKNOWN_FIELD"));
        assert!(display.contains("budget"));
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = SchemaError::type_mismatch("year", "int", "nineteen");
        assert!(err.message().contains("year"));
        assert!(err.message().contains("int"));
        assert!(err.message().contains("nineteen"));
    }
}
