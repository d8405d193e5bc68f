//! Extracted cell record repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::extraction::{CellRecord, CellRecordStore, ProcessingStatus};

const SELECT_COLUMNS: &str = r#"
    SELECT id, file_name, sheet_name, row_num, column_name, cell_value, status,
           error_message, processed_by, created_at, file_metadata_id
    FROM excel_data
"#;

fn from_row(row: &SqliteRow) -> Result<CellRecord> {
    let status: String = row.try_get("status")?;
    Ok(CellRecord {
        id: row.try_get("id")?,
        file_name: row.try_get("file_name")?,
        sheet_name: row.try_get("sheet_name")?,
        row_number: row.try_get::<i64, _>("row_num")? as u32,
        column_name: row.try_get("column_name")?,
        cell_value: row.try_get("cell_value")?,
        status: status.parse::<ProcessingStatus>()?,
        error_message: row.try_get("error_message")?,
        processed_by: row.try_get("processed_by")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        file_id: row.try_get("file_metadata_id")?,
    })
}

/// Insert a batch of records in a single transaction
pub async fn insert_records(pool: &SqlitePool, records: &[CellRecord]) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    for record in records {
        sqlx::query(
            r#"
            INSERT INTO excel_data (
                id, file_name, sheet_name, row_num, column_name, cell_value, status,
                error_message, processed_by, created_at, file_metadata_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.file_name)
        .bind(&record.sheet_name)
        .bind(record.row_number as i64)
        .bind(&record.column_name)
        .bind(&record.cell_value)
        .bind(record.status.as_str())
        .bind(&record.error_message)
        .bind(&record.processed_by)
        .bind(record.created_at)
        .bind(&record.file_id)
        .execute(&mut *tx)
        .await
        .with_context(|| {
            format!(
                "Failed to insert cell record {}!{}{}",
                record.sheet_name, record.column_name, record.row_number
            )
        })?;
    }

    tx.commit().await.context("Failed to commit cell records")?;
    log::debug!("Inserted {} cell records", records.len());

    Ok(())
}

/// Records extracted from a file name, in insertion order
pub async fn list_records_by_file_name(pool: &SqlitePool, file_name: &str) -> Result<Vec<CellRecord>> {
    let rows = sqlx::query(&format!("{} WHERE file_name = ? ORDER BY rowid", SELECT_COLUMNS))
        .bind(file_name)
        .fetch_all(pool)
        .await
        .context("Failed to list cell records by file name")?;

    rows.iter().map(from_row).collect()
}

/// Records with a given status, in insertion order
pub async fn list_records_by_status(
    pool: &SqlitePool,
    status: ProcessingStatus,
) -> Result<Vec<CellRecord>> {
    let rows = sqlx::query(&format!("{} WHERE status = ? ORDER BY rowid", SELECT_COLUMNS))
        .bind(status.as_str())
        .fetch_all(pool)
        .await
        .context("Failed to list cell records by status")?;

    rows.iter().map(from_row).collect()
}

/// SQLite-backed [`CellRecordStore`]
#[derive(Debug, Clone)]
pub struct SqliteCellRecordStore {
    pool: SqlitePool,
}

impl SqliteCellRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CellRecordStore for SqliteCellRecordStore {
    async fn save_all(&self, records: &[CellRecord]) -> Result<()> {
        insert_records(&self.pool, records).await
    }

    async fn find_by_file_name(&self, file_name: &str) -> Result<Vec<CellRecord>> {
        list_records_by_file_name(&self.pool, file_name).await
    }

    async fn find_by_status(&self, status: ProcessingStatus) -> Result<Vec<CellRecord>> {
        list_records_by_status(&self.pool, status).await
    }
}
