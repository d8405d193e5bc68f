//! Stored source files and their metadata

mod local;

pub use local::LocalFileStore;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::payload::FilePayload;

/// Status of a stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileStatus {
    /// Available for download
    Active,
    /// Soft-deleted; bytes stay on disk
    Deleted,
    Processing,
    Failed,
    Quarantined,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Active => "ACTIVE",
            FileStatus::Deleted => "DELETED",
            FileStatus::Processing => "PROCESSING",
            FileStatus::Failed => "FAILED",
            FileStatus::Quarantined => "QUARANTINED",
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FileStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(FileStatus::Active),
            "DELETED" => Ok(FileStatus::Deleted),
            "PROCESSING" => Ok(FileStatus::Processing),
            "FAILED" => Ok(FileStatus::Failed),
            "QUARANTINED" => Ok(FileStatus::Quarantined),
            other => bail!("Unknown file status: {}", other),
        }
    }
}

/// Metadata of a stored file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub id: String,
    pub file_name: String,
    pub file_type: String,
    pub size: u64,
    /// Location relative to the storage root
    pub storage_path: String,
    pub original_file_name: String,
    pub uploaded_by: Option<String>,
    pub upload_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub status: FileStatus,
}

/// File storage used by the extraction pipeline
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store the bytes under a fresh name and record their metadata
    async fn store_file(&self, file: &FilePayload, uploaded_by: &str) -> Result<FileMetadata>;

    /// Bytes of an active file
    async fn load_file(&self, id: &str) -> Result<Vec<u8>>;

    /// Mark a file deleted; `false` if no such file
    async fn delete_file(&self, id: &str) -> Result<bool>;

    async fn file_info(&self, id: &str) -> Result<Option<FileMetadata>>;
}
