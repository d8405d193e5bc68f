use anyhow::Result;
use async_trait::async_trait;

use super::{CellRecord, ProcessingStatus};

/// Persistence for extracted cell records
#[async_trait]
pub trait CellRecordStore: Send + Sync {
    /// Persist all records atomically
    async fn save_all(&self, records: &[CellRecord]) -> Result<()>;

    async fn find_by_file_name(&self, file_name: &str) -> Result<Vec<CellRecord>>;

    async fn find_by_status(&self, status: ProcessingStatus) -> Result<Vec<CellRecord>>;
}
