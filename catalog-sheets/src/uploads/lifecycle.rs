//! Upload record and its status transitions
//!
//! ```text
//! Uploaded ──► Processing ──► Completed
//!    │              │
//!    └──────────────┴───────► Failed
//! ```

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of one upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    Uploaded,
    Processing,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Uploaded => "UPLOADED",
            UploadStatus::Processing => "PROCESSING",
            UploadStatus::Completed => "COMPLETED",
            UploadStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Failed)
    }

    /// Whether moving from `self` to `next` is a forward step
    pub fn can_transition_to(&self, next: UploadStatus) -> bool {
        use UploadStatus::*;
        matches!(
            (self, next),
            (Uploaded, Processing) | (Uploaded, Failed) | (Processing, Completed) | (Processing, Failed)
        )
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UploadStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "UPLOADED" => Ok(UploadStatus::Uploaded),
            "PROCESSING" => Ok(UploadStatus::Processing),
            "COMPLETED" => Ok(UploadStatus::Completed),
            "FAILED" => Ok(UploadStatus::Failed),
            other => bail!("Unknown upload status: {}", other),
        }
    }
}

/// One uploaded spreadsheet and what became of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: Option<i64>,
    /// Generated name the file is stored under
    pub filename: String,
    pub original_filename: String,
    /// Set once the bytes are on disk
    pub file_path: Option<String>,
    pub file_size: u64,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub total_records: usize,
    pub processed_records: usize,
    pub failed_records: usize,
    pub status: UploadStatus,
}

impl UploadRecord {
    /// A fresh record in the `Uploaded` state
    pub fn new(
        original_filename: impl Into<String>,
        filename: impl Into<String>,
        file_size: u64,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            filename: filename.into(),
            original_filename: original_filename.into(),
            file_path: None,
            file_size,
            content_type: content_type.into(),
            uploaded_at: Utc::now(),
            total_records: 0,
            processed_records: 0,
            failed_records: 0,
            status: UploadStatus::Uploaded,
        }
    }

    /// Move to `next`, refusing to go backwards or leave a terminal state
    pub fn transition(&mut self, next: UploadStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            bail!(
                "Illegal upload status transition {} -> {} for '{}'",
                self.status,
                next,
                self.original_filename
            );
        }
        log::debug!("Upload '{}': {} -> {}", self.original_filename, self.status, next);
        self.status = next;
        Ok(())
    }

    /// Record final counters and complete
    pub fn complete(&mut self, total: usize, succeeded: usize, failed: usize) -> Result<()> {
        self.transition(UploadStatus::Completed)?;
        self.total_records = total;
        self.processed_records = succeeded + failed;
        self.failed_records = failed;
        Ok(())
    }

    /// Rows that were imported successfully
    pub fn successful_records(&self) -> usize {
        self.processed_records.saturating_sub(self.failed_records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UploadRecord {
        UploadRecord::new("products.xlsx", "products_x.xlsx", 10, "application/x")
    }

    #[test]
    fn test_forward_transitions() {
        let mut upload = record();
        assert_eq!(upload.status, UploadStatus::Uploaded);
        upload.transition(UploadStatus::Processing).unwrap();
        upload.complete(4, 3, 1).unwrap();

        assert_eq!(upload.status, UploadStatus::Completed);
        assert_eq!(upload.total_records, 4);
        assert_eq!(upload.processed_records, 4);
        assert_eq!(upload.failed_records, 1);
        assert_eq!(upload.successful_records(), 3);
    }

    #[test]
    fn test_failure_from_any_live_state() {
        let mut early = record();
        early.transition(UploadStatus::Failed).unwrap();

        let mut late = record();
        late.transition(UploadStatus::Processing).unwrap();
        late.transition(UploadStatus::Failed).unwrap();
    }

    #[test]
    fn test_no_backwards_or_terminal_moves() {
        let mut upload = record();
        upload.transition(UploadStatus::Processing).unwrap();
        assert!(upload.transition(UploadStatus::Uploaded).is_err());

        upload.transition(UploadStatus::Failed).unwrap();
        assert!(upload.transition(UploadStatus::Completed).is_err());
        assert!(upload.transition(UploadStatus::Processing).is_err());
        assert_eq!(upload.status, UploadStatus::Failed);

        // Completion requires processing first
        assert!(record().complete(1, 1, 0).is_err());
    }

    #[test]
    fn test_status_strings() {
        for status in [
            UploadStatus::Uploaded,
            UploadStatus::Processing,
            UploadStatus::Completed,
            UploadStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<UploadStatus>().unwrap(), status);
        }
        assert!("done".parse::<UploadStatus>().is_err());
        assert!(UploadStatus::Failed.is_terminal());
        assert!(!UploadStatus::Processing.is_terminal());
    }
}
