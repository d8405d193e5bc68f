use anyhow::Result;
use async_trait::async_trait;

use super::UploadRecord;

/// Persistence for upload records
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Insert a record without an id, update one that has an id
    async fn save(&self, record: UploadRecord) -> Result<UploadRecord>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UploadRecord>>;
}
