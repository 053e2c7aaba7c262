//! # Ingest Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for ingestion
pub type IngestResult<T> = Result<T, IngestError>;

/// Failures while loading the source data set
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid data set: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
