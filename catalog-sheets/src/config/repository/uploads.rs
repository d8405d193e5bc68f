//! Upload record repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::uploads::{UploadRecord, UploadStatus, UploadStore};

fn from_row(row: &SqliteRow) -> Result<UploadRecord> {
    let status: String = row.try_get("status")?;
    Ok(UploadRecord {
        id: Some(row.try_get("id")?),
        filename: row.try_get("filename")?,
        original_filename: row.try_get("original_filename")?,
        file_path: row.try_get("file_path")?,
        file_size: row.try_get::<i64, _>("file_size")? as u64,
        content_type: row.try_get("content_type")?,
        uploaded_at: row.try_get::<DateTime<Utc>, _>("uploaded_at")?,
        total_records: row.try_get::<i64, _>("total_records")? as usize,
        processed_records: row.try_get::<i64, _>("processed_records")? as usize,
        failed_records: row.try_get::<i64, _>("failed_records")? as usize,
        status: status.parse::<UploadStatus>()?,
    })
}

/// Get an upload record by id
pub async fn get_upload(pool: &SqlitePool, id: i64) -> Result<Option<UploadRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, filename, original_filename, file_path, file_size, content_type,
               uploaded_at, total_records, processed_records, failed_records, status
        FROM uploaded_files
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get upload record")?;

    row.as_ref().map(from_row).transpose()
}

/// Insert a new upload record, returning its id
pub async fn insert_upload(pool: &SqlitePool, record: &UploadRecord) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO uploaded_files (
            filename, original_filename, file_path, file_size, content_type,
            uploaded_at, total_records, processed_records, failed_records, status
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.filename)
    .bind(&record.original_filename)
    .bind(&record.file_path)
    .bind(record.file_size as i64)
    .bind(&record.content_type)
    .bind(record.uploaded_at)
    .bind(record.total_records as i64)
    .bind(record.processed_records as i64)
    .bind(record.failed_records as i64)
    .bind(record.status.as_str())
    .execute(pool)
    .await
    .context("Failed to insert upload record")?;

    Ok(result.last_insert_rowid())
}

/// Update the mutable parts of an upload record
pub async fn update_upload(pool: &SqlitePool, id: i64, record: &UploadRecord) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE uploaded_files
        SET file_path = ?, total_records = ?, processed_records = ?,
            failed_records = ?, status = ?
        WHERE id = ?
        "#,
    )
    .bind(&record.file_path)
    .bind(record.total_records as i64)
    .bind(record.processed_records as i64)
    .bind(record.failed_records as i64)
    .bind(record.status.as_str())
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update upload record")?;

    Ok(())
}

/// SQLite-backed [`UploadStore`]
#[derive(Debug, Clone)]
pub struct SqliteUploadStore {
    pool: SqlitePool,
}

impl SqliteUploadStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UploadStore for SqliteUploadStore {
    async fn save(&self, mut record: UploadRecord) -> Result<UploadRecord> {
        match record.id {
            Some(id) => update_upload(&self.pool, id, &record).await?,
            None => record.id = Some(insert_upload(&self.pool, &record).await?),
        }
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UploadRecord>> {
        get_upload(&self.pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::repository::connect_in_memory;

    #[tokio::test]
    async fn test_insert_then_update() {
        let store = SqliteUploadStore::new(connect_in_memory().await.unwrap());

        let record = UploadRecord::new("in.xlsx", "products_1.xlsx", 42, "application/x");
        let mut saved = store.save(record).await.unwrap();
        let id = saved.id.unwrap();

        let loaded = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(loaded.status, UploadStatus::Uploaded);
        assert_eq!(loaded.file_size, 42);
        assert_eq!(loaded.file_path, None);

        saved.file_path = Some("/tmp/products_1.xlsx".into());
        saved.transition(UploadStatus::Processing).unwrap();
        saved.complete(3, 2, 1).unwrap();
        store.save(saved.clone()).await.unwrap();

        let loaded = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(loaded.status, UploadStatus::Completed);
        assert_eq!(loaded.file_path.as_deref(), Some("/tmp/products_1.xlsx"));
        assert_eq!(loaded.total_records, 3);
        assert_eq!(loaded.processed_records, 3);
        assert_eq!(loaded.failed_records, 1);

        assert!(store.find_by_id(id + 1).await.unwrap().is_none());
    }
}
