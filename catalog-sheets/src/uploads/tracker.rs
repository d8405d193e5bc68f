//! Product import driven by an upload record
//!
//! The record is saved at every status change, so an import that dies halfway
//! leaves an `UPLOADED` or `PROCESSING` row behind rather than nothing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use super::naming::generate_storage_name;
use super::{UploadRecord, UploadStatus, UploadStore};
use crate::catalog::{CatalogStore, decode_products, reconcile};
use crate::error::ImportError;
use crate::payload::FilePayload;
use crate::sheets::{EXCEL_CONTENT_TYPE, read_workbook};

/// What an import call hands back to its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub total_records: usize,
    pub successful_imports: usize,
    pub failed_imports: usize,
    pub error_messages: Vec<String>,
    pub file_id: Option<i64>,
    pub file_path: Option<String>,
}

/// Runs product imports and keeps their upload records current
pub struct UploadTracker {
    catalog: Arc<dyn CatalogStore>,
    uploads: Arc<dyn UploadStore>,
    upload_dir: PathBuf,
}

impl UploadTracker {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        uploads: Arc<dyn UploadStore>,
        upload_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            uploads,
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Import products from an uploaded workbook
    ///
    /// Per-row problems are reported in the outcome. An `Err` means the batch
    /// as a whole failed; the upload record is marked `FAILED` first.
    pub async fn import_products(&self, file: &FilePayload) -> Result<ImportOutcome, ImportError> {
        log::info!("Starting Excel import for file: {}", file.file_name);

        let record = UploadRecord::new(
            &file.file_name,
            generate_storage_name(&file.file_name, Local::now()),
            file.size(),
            &file.content_type,
        );
        let mut record = self.uploads.save(record).await.map_err(ImportError::Store)?;

        if file.content_type != EXCEL_CONTENT_TYPE {
            log::error!("Invalid file format: {}", file.content_type);
            self.mark_failed(&mut record).await;
            return Err(ImportError::InvalidFormat(file.content_type.clone()));
        }

        match self.process(&mut record, file).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                log::error!("Import of '{}' failed: {}", file.file_name, err);
                self.mark_failed(&mut record).await;
                Err(err)
            }
        }
    }

    async fn process(&self, record: &mut UploadRecord, file: &FilePayload) -> Result<ImportOutcome, ImportError> {
        let path = self
            .write_file(&record.filename, &file.bytes)
            .await
            .map_err(ImportError::Processing)?;

        let mut processing = record.clone();
        processing.file_path = Some(path.display().to_string());
        processing
            .transition(UploadStatus::Processing)
            .map_err(ImportError::Processing)?;
        *record = self.uploads.save(processing).await.map_err(ImportError::Store)?;

        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read stored file: {}", path.display()))
            .map_err(ImportError::Processing)?;
        let rows = read_workbook(&bytes)
            .and_then(|workbook| decode_products(&workbook))
            .map_err(ImportError::Processing)?;
        log::debug!("Parsed {} products from Excel file", rows.len());

        let summary = reconcile(self.catalog.as_ref(), rows)
            .await
            .map_err(ImportError::Store)?;

        let mut completed = record.clone();
        completed
            .complete(summary.total, summary.succeeded(), summary.failed)
            .map_err(ImportError::Processing)?;
        *record = self.uploads.save(completed).await.map_err(ImportError::Store)?;

        log::info!(
            "Excel import completed. Successful: {}, Failed: {} ({} conflicts)",
            summary.succeeded(),
            summary.failed,
            summary.conflicts()
        );

        Ok(ImportOutcome {
            total_records: summary.total,
            successful_imports: summary.succeeded(),
            failed_imports: summary.failed,
            error_messages: summary.messages(),
            file_id: record.id,
            file_path: record.file_path.clone(),
        })
    }

    /// Write bytes under the upload dir; never overwrites an existing file
    async fn write_file(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .with_context(|| format!("Failed to create upload directory: {}", self.upload_dir.display()))?;

        let path = self.upload_dir.join(filename);
        let mut out = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        out.write_all(bytes)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        out.flush().await?;

        Ok(path)
    }

    async fn mark_failed(&self, record: &mut UploadRecord) {
        if let Err(e) = record.transition(UploadStatus::Failed) {
            log::warn!("{:#}", e);
            return;
        }
        match self.uploads.save(record.clone()).await {
            Ok(saved) => *record = saved,
            Err(e) => log::error!(
                "Failed to mark upload '{}' as failed: {:#}",
                record.original_filename,
                e
            ),
        }
    }

    pub async fn find_upload(&self, id: i64) -> Result<Option<UploadRecord>> {
        self.uploads.find_by_id(id).await
    }

    /// The stored bytes of a previous upload, with its record
    pub async fn load_uploaded_file(&self, id: i64) -> Result<(UploadRecord, Vec<u8>)> {
        let record = self
            .uploads
            .find_by_id(id)
            .await?
            .with_context(|| format!("Upload not found with id: {}", id))?;

        let path = match &record.file_path {
            Some(path) => PathBuf::from(path),
            None => bail!("Upload {} has no stored file (status {})", id, record.status),
        };

        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read stored file: {}", path.display()))?;

        Ok((record, bytes))
    }
}
