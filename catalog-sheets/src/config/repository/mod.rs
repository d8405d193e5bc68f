//! Repository layer for database operations

pub mod cell_records;
pub mod files;
pub mod products;
pub mod schema;
pub mod uploads;

pub use cell_records::SqliteCellRecordStore;
pub use products::SqliteCatalogStore;
pub use uploads::SqliteUploadStore;

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Open (creating if needed) the SQLite database at `path` and ensure the schema
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create database directory: {}", parent.display()))?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", path.display()))?;

    schema::ensure_schema(&pool).await?;
    log::debug!("Connected to database at {}", path.display());

    Ok(pool)
}

/// Private in-memory database; one connection so every query sees the same data
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory database")?;

    schema::ensure_schema(&pool).await?;

    Ok(pool)
}
