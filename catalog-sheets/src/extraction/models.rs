use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing state of an extracted cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Processed,
    Failed,
    CompletedWithWarnings,
    Cancelled,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "PENDING",
            ProcessingStatus::Processing => "PROCESSING",
            ProcessingStatus::Processed => "PROCESSED",
            ProcessingStatus::Failed => "FAILED",
            ProcessingStatus::CompletedWithWarnings => "COMPLETED_WITH_WARNINGS",
            ProcessingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProcessingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "PENDING" => Ok(ProcessingStatus::Pending),
            "PROCESSING" => Ok(ProcessingStatus::Processing),
            "PROCESSED" => Ok(ProcessingStatus::Processed),
            "FAILED" => Ok(ProcessingStatus::Failed),
            "COMPLETED_WITH_WARNINGS" => Ok(ProcessingStatus::CompletedWithWarnings),
            "CANCELLED" => Ok(ProcessingStatus::Cancelled),
            other => bail!("Unknown processing status: {}", other),
        }
    }
}

/// One present cell of a source workbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub id: String,
    pub file_name: String,
    pub sheet_name: String,
    /// 1-based, as shown by spreadsheet programs
    pub row_number: u32,
    /// Column letters, e.g. `A`, `AB`
    pub column_name: String,
    pub cell_value: String,
    pub status: ProcessingStatus,
    pub error_message: Option<String>,
    pub processed_by: String,
    pub created_at: DateTime<Utc>,
    /// Stored file this record was extracted from
    pub file_id: Option<String>,
}

/// Result of extracting and persisting a whole file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSummary {
    pub file_id: String,
    pub file_name: String,
    pub record_count: usize,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "completed-with-warnings".parse::<ProcessingStatus>().unwrap(),
            ProcessingStatus::CompletedWithWarnings
        );
        assert_eq!("processed".parse::<ProcessingStatus>().unwrap(), ProcessingStatus::Processed);
        assert!("done".parse::<ProcessingStatus>().is_err());
    }

    #[test]
    fn test_status_serde_matches_storage_form() {
        let json = serde_json::to_string(&ProcessingStatus::CompletedWithWarnings).unwrap();
        assert_eq!(json, "\"COMPLETED_WITH_WARNINGS\"");
    }
}
