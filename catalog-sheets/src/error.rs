//! Batch-level import errors
//!
//! Problems with individual rows never show up here; they are collected as
//! messages in the import outcome.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The upload is not an xlsx workbook; nothing was processed
    #[error("Please upload an Excel file (received content type '{0}')")]
    InvalidFormat(String),

    /// The workbook could not be written, read or parsed
    #[error("Failed to process Excel file: {0:#}")]
    Processing(anyhow::Error),

    /// A store failed mid-import; rows saved before the failure are kept
    #[error("Storage failure during import: {0:#}")]
    Store(anyhow::Error),
}

impl ImportError {
    /// Whether any rows could have been persisted before the error
    pub fn may_have_partial_results(&self) -> bool {
        matches!(self, ImportError::Store(_))
    }
}
