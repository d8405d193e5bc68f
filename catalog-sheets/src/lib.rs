//! Spreadsheet import and export for a product catalog
//!
//! Workbooks are read into a sparse grid ([`sheets`]), either flattened into
//! per-cell records ([`extraction`]) or decoded into products and reconciled
//! against the catalog ([`catalog`]). Imports run under an upload record that
//! tracks their progress ([`uploads`]).

pub mod catalog;
pub mod config;
pub mod error;
pub mod extraction;
pub mod identity;
pub mod payload;
pub mod sheets;
pub mod storage;
pub mod uploads;

use std::sync::Arc;

use anyhow::Result;
use sqlx::SqlitePool;

use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::config::repository::{SqliteCatalogStore, SqliteCellRecordStore, SqliteUploadStore};
use crate::extraction::CellExtractor;
use crate::identity::StaticIdentity;
use crate::storage::{FileStore, LocalFileStore};
use crate::uploads::UploadTracker;

/// Services wired against one database
pub struct App {
    pub pool: SqlitePool,
    pub catalog: Arc<dyn CatalogStore>,
    pub files: Arc<dyn FileStore>,
    pub tracker: UploadTracker,
    pub extractor: CellExtractor,
}

impl App {
    /// Connect to the configured database and build every service
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = config.connect().await?;
        Ok(Self::with_pool(pool, config))
    }

    pub fn with_pool(pool: SqlitePool, config: &Config) -> Self {
        let catalog: Arc<dyn CatalogStore> = Arc::new(SqliteCatalogStore::new(pool.clone()));
        let files: Arc<dyn FileStore> =
            Arc::new(LocalFileStore::new(config.storage_dir.clone(), pool.clone()));

        let tracker = UploadTracker::new(
            catalog.clone(),
            Arc::new(SqliteUploadStore::new(pool.clone())),
            config.upload_dir.clone(),
        );
        let extractor = CellExtractor::new(
            Arc::new(SqliteCellRecordStore::new(pool.clone())),
            files.clone(),
            Arc::new(StaticIdentity::new(config.user.clone())),
        );

        Self {
            pool,
            catalog,
            files,
            tracker,
            extractor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Product, export_products, products_to_workbook};
    use crate::config::repository::connect_in_memory;
    use crate::payload::FilePayload;

    #[tokio::test]
    async fn test_import_then_extract_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database: dir.path().join("unused.db"),
            upload_dir: dir.path().join("uploads"),
            storage_dir: dir.path().join("files"),
            user: Some("dana".into()),
        };
        let app = App::with_pool(connect_in_memory().await.unwrap(), &config);

        let bytes = products_to_workbook(&[Product::new("Lamp", 19.99, 3)]).unwrap();
        let payload = FilePayload::excel("lamps.xlsx", bytes);

        let outcome = app.tracker.import_products(&payload).await.unwrap();
        assert_eq!(outcome.successful_imports, 1);

        let summary = app.extractor.process_and_save(&payload).await.unwrap();
        // Header plus all five slots; id and description are blank
        assert_eq!(summary.record_count, 10);
        let info = app.files.file_info(&summary.file_id).await.unwrap().unwrap();
        assert_eq!(info.uploaded_by.as_deref(), Some("dana"));

        let export = export_products(app.catalog.as_ref()).await.unwrap();
        assert!(export.file_name.starts_with("products_"));
    }
}
