//! # Format Errors

use thiserror::Error;

/// Result type for formatting and export
pub type FormatResult<T> = Result<T, FormatError>;

/// Export failures
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Row width differs from the header
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}
