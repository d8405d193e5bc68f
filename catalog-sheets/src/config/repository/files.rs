//! Stored file metadata repository

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::storage::{FileMetadata, FileStatus};

fn from_row(row: &SqliteRow) -> Result<FileMetadata> {
    let status: String = row.try_get("status")?;
    Ok(FileMetadata {
        id: row.try_get("id")?,
        file_name: row.try_get("file_name")?,
        file_type: row.try_get("file_type")?,
        size: row.try_get::<i64, _>("size")? as u64,
        storage_path: row.try_get("storage_path")?,
        original_file_name: row.try_get("original_file_name")?,
        uploaded_by: row.try_get("uploaded_by")?,
        upload_date: row.try_get::<DateTime<Utc>, _>("upload_date")?,
        last_modified_date: row.try_get::<DateTime<Utc>, _>("last_modified_date")?,
        status: status.parse::<FileStatus>()?,
    })
}

/// Get file metadata by id, whatever its status
pub async fn get_file(pool: &SqlitePool, id: &str) -> Result<Option<FileMetadata>> {
    let row = sqlx::query(
        r#"
        SELECT id, file_name, file_type, size, storage_path, original_file_name,
               upload_date, last_modified_date, uploaded_by, status
        FROM file_metadata
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get file metadata")?;

    row.as_ref().map(from_row).transpose()
}

/// Record a newly stored file
pub async fn insert_file(pool: &SqlitePool, metadata: &FileMetadata) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO file_metadata (
            id, file_name, file_type, size, storage_path, original_file_name,
            upload_date, last_modified_date, uploaded_by, status
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&metadata.id)
    .bind(&metadata.file_name)
    .bind(&metadata.file_type)
    .bind(metadata.size as i64)
    .bind(&metadata.storage_path)
    .bind(&metadata.original_file_name)
    .bind(metadata.upload_date)
    .bind(metadata.last_modified_date)
    .bind(&metadata.uploaded_by)
    .bind(metadata.status.as_str())
    .execute(pool)
    .await
    .context("Failed to insert file metadata")?;

    Ok(())
}

/// Change a file's status; returns whether the file exists
pub async fn set_file_status(pool: &SqlitePool, id: &str, status: FileStatus) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE file_metadata SET status = ?, last_modified_date = ? WHERE id = ?",
    )
    .bind(status.as_str())
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update file status")?;

    Ok(result.rows_affected() > 0)
}
