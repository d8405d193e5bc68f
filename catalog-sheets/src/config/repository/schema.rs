//! Table definitions, applied on every connect

use anyhow::{Context, Result};
use sqlx::SqlitePool;

const STATEMENTS: &[&str] = &[
    // Names are deliberately not UNIQUE: uniqueness is checked by the importer only
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        price REAL NOT NULL,
        quantity INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_products_name ON products(name)",
    r#"
    CREATE TABLE IF NOT EXISTS uploaded_files (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        filename TEXT NOT NULL,
        original_filename TEXT NOT NULL,
        file_path TEXT,
        file_size INTEGER NOT NULL,
        content_type TEXT NOT NULL,
        uploaded_at TEXT NOT NULL,
        total_records INTEGER NOT NULL DEFAULT 0,
        processed_records INTEGER NOT NULL DEFAULT 0,
        failed_records INTEGER NOT NULL DEFAULT 0,
        status TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS file_metadata (
        id TEXT PRIMARY KEY,
        file_name TEXT NOT NULL,
        file_type TEXT NOT NULL,
        size INTEGER NOT NULL,
        storage_path TEXT NOT NULL UNIQUE,
        original_file_name TEXT NOT NULL,
        upload_date TEXT NOT NULL,
        last_modified_date TEXT NOT NULL,
        uploaded_by TEXT,
        status TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS excel_data (
        id TEXT PRIMARY KEY,
        file_name TEXT NOT NULL,
        sheet_name TEXT NOT NULL,
        row_num INTEGER NOT NULL,
        column_name TEXT NOT NULL,
        cell_value TEXT NOT NULL,
        status TEXT NOT NULL,
        error_message TEXT,
        processed_by TEXT NOT NULL,
        created_at TEXT NOT NULL,
        file_metadata_id TEXT REFERENCES file_metadata(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_excel_data_file_name ON excel_data(file_name)",
    "CREATE INDEX IF NOT EXISTS idx_excel_data_status ON excel_data(status)",
];

/// Create any missing tables and indexes
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to apply database schema")?;
    }
    Ok(())
}
