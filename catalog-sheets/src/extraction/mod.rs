//! Generic cell extraction
//!
//! Flattens every present cell of every sheet into a [`CellRecord`] addressed
//! by sheet, 1-based row number and column letters. Nothing is validated:
//! every record comes out `PROCESSED`.

mod models;
mod store;

pub use models::{CellRecord, ExtractionSummary, ProcessingStatus};
pub use store::CellRecordStore;

use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ImportError;
use crate::identity::{IdentityProvider, uploader};
use crate::payload::FilePayload;
use crate::sheets::{Workbook, column_label, read_workbook};
use crate::storage::FileStore;

pub const SUCCESS_STATUS: &str = "SUCCESS";

/// One record per present cell, in sheet, row, column order
pub fn extract_cells(
    workbook: &Workbook,
    file_name: &str,
    processed_by: &str,
    now: DateTime<Utc>,
) -> Vec<CellRecord> {
    let mut records = Vec::with_capacity(workbook.cell_count());

    for sheet in &workbook.sheets {
        for row in &sheet.rows {
            for cell in &row.cells {
                records.push(CellRecord {
                    id: Uuid::new_v4().to_string(),
                    file_name: file_name.to_string(),
                    sheet_name: sheet.name.clone(),
                    row_number: row.index as u32 + 1,
                    column_name: column_label(cell.column),
                    cell_value: cell.value.to_string(),
                    status: ProcessingStatus::Processed,
                    error_message: None,
                    processed_by: processed_by.to_string(),
                    created_at: now,
                    file_id: None,
                });
            }
        }
    }

    records
}

fn parse(bytes: &[u8], file_name: &str, processed_by: &str) -> Result<Vec<CellRecord>, ImportError> {
    let workbook = read_workbook(bytes).map_err(ImportError::Processing)?;
    let records = extract_cells(&workbook, file_name, processed_by, Utc::now());
    log::info!(
        "Extracted {} cells from '{}' ({} sheets)",
        records.len(),
        file_name,
        workbook.sheets.len()
    );
    Ok(records)
}

/// Runs cell extraction and, on request, persists the results
pub struct CellExtractor {
    records: Arc<dyn CellRecordStore>,
    files: Arc<dyn FileStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl CellExtractor {
    pub fn new(
        records: Arc<dyn CellRecordStore>,
        files: Arc<dyn FileStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            records,
            files,
            identity,
        }
    }

    /// Extract records without storing anything
    pub fn process(&self, file: &FilePayload) -> Result<Vec<CellRecord>, ImportError> {
        parse(&file.bytes, &file.file_name, &uploader(self.identity.as_ref()))
    }

    /// Store the file, link every record to it and save the records as one batch
    pub async fn process_and_save(&self, file: &FilePayload) -> Result<ExtractionSummary, ImportError> {
        let user = uploader(self.identity.as_ref());
        let mut records = parse(&file.bytes, &file.file_name, &user)?;

        let stored = self
            .files
            .store_file(file, &user)
            .await
            .map_err(ImportError::Store)?;

        for record in &mut records {
            record.file_id = Some(stored.id.clone());
        }

        self.records
            .save_all(&records)
            .await
            .map_err(ImportError::Store)?;

        log::info!("Saved {} cell records for file {}", records.len(), stored.id);

        Ok(ExtractionSummary {
            file_id: stored.id,
            file_name: stored.file_name,
            record_count: records.len(),
            status: SUCCESS_STATUS.to_string(),
            timestamp: Utc::now(),
        })
    }

    /// Same as [`CellExtractor::process`] on a blocking worker thread
    pub async fn process_async(&self, file: FilePayload) -> Result<Vec<CellRecord>, ImportError> {
        let user = uploader(self.identity.as_ref());

        tokio::task::spawn_blocking(move || parse(&file.bytes, &file.file_name, &user))
            .await
            .map_err(|e| ImportError::Processing(anyhow!("Extraction task failed: {}", e)))?
    }

    pub async fn records_by_file_name(&self, file_name: &str) -> anyhow::Result<Vec<CellRecord>> {
        self.records.find_by_file_name(file_name).await
    }

    pub async fn records_by_status(&self, status: ProcessingStatus) -> anyhow::Result<Vec<CellRecord>> {
        self.records.find_by_status(status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::repository::{SqliteCellRecordStore, connect_in_memory};
    use crate::identity::StaticIdentity;
    use crate::storage::LocalFileStore;
    use crate::sheets::{Cell, CellValue, Row, Sheet};
    use rust_xlsxwriter::Workbook as XlsxWorkbook;

    fn sample_bytes() -> Vec<u8> {
        let mut workbook = XlsxWorkbook::new();
        let first = workbook.add_worksheet();
        first.set_name("Data").unwrap();
        first.write_string(0, 0, "Name").unwrap();
        first.write_number(1, 0, 12.5).unwrap();
        first.write_boolean(1, 2, true).unwrap();
        let second = workbook.add_worksheet();
        second.set_name("Notes").unwrap();
        second.write_string(4, 27, "far").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    async fn extractor(dir: &std::path::Path, user: Option<&str>) -> CellExtractor {
        let pool = connect_in_memory().await.unwrap();
        CellExtractor::new(
            Arc::new(SqliteCellRecordStore::new(pool.clone())),
            Arc::new(LocalFileStore::new(dir.join("files"), pool)),
            Arc::new(StaticIdentity::new(user.map(str::to_string))),
        )
    }

    #[test]
    fn test_extract_cells_addresses() {
        let workbook = Workbook {
            sheets: vec![Sheet {
                name: "S".into(),
                rows: vec![Row {
                    index: 2,
                    cells: vec![
                        Cell { column: 0, value: CellValue::Number(5.0) },
                        Cell { column: 26, value: CellValue::Empty },
                    ],
                }],
            }],
        };

        let records = extract_cells(&workbook, "f.xlsx", "bob", Utc::now());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row_number, 3);
        assert_eq!(records[0].column_name, "A");
        assert_eq!(records[0].cell_value, "5.0");
        assert_eq!(records[1].column_name, "AA");
        assert_eq!(records[1].cell_value, "");
        assert!(records.iter().all(|r| r.status == ProcessingStatus::Processed));
        assert!(records.iter().all(|r| r.processed_by == "bob"));
        assert_ne!(records[0].id, records[1].id);
    }

    #[tokio::test]
    async fn test_process_without_saving() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = extractor(dir.path(), None).await;

        let records = extractor
            .process(&FilePayload::excel("in.xlsx", sample_bytes()))
            .unwrap();

        let cells: Vec<(&str, u32, &str, &str)> = records
            .iter()
            .map(|r| (r.sheet_name.as_str(), r.row_number, r.column_name.as_str(), r.cell_value.as_str()))
            .collect();
        assert_eq!(
            cells,
            vec![
                ("Data", 1, "A", "Name"),
                ("Data", 2, "A", "12.5"),
                ("Data", 2, "C", "true"),
                ("Notes", 5, "AB", "far"),
            ]
        );
        assert!(records.iter().all(|r| r.processed_by == "system" && r.file_id.is_none()));
        assert!(extractor.records_by_file_name("in.xlsx").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_process_and_save_links_records() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = extractor(dir.path(), Some("alice")).await;

        let summary = extractor
            .process_and_save(&FilePayload::excel("in.xlsx", sample_bytes()))
            .await
            .unwrap();

        assert_eq!(summary.status, "SUCCESS");
        assert_eq!(summary.record_count, 4);
        assert_eq!(summary.file_name, "in.xlsx");

        let saved = extractor.records_by_file_name("in.xlsx").await.unwrap();
        assert_eq!(saved.len(), 4);
        assert!(saved.iter().all(|r| r.file_id.as_deref() == Some(summary.file_id.as_str())));
        assert!(saved.iter().all(|r| r.processed_by == "alice"));

        let processed = extractor
            .records_by_status(ProcessingStatus::Processed)
            .await
            .unwrap();
        assert_eq!(processed.len(), 4);
    }

    #[tokio::test]
    async fn test_process_async_matches_process() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = extractor(dir.path(), None).await;
        let payload = FilePayload::excel("in.xlsx", sample_bytes());

        let sync = extractor.process(&payload).unwrap();
        let background = extractor.process_async(payload).await.unwrap();

        let values = |records: &[CellRecord]| -> Vec<String> {
            records.iter().map(|r| format!("{}{}={}", r.column_name, r.row_number, r.cell_value)).collect()
        };
        assert_eq!(values(&sync), values(&background));
    }

    #[tokio::test]
    async fn test_unreadable_file_is_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = extractor(dir.path(), None).await;

        let err = extractor
            .process_and_save(&FilePayload::excel("bad.xlsx", b"not a workbook".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::Processing(_)));
        assert!(extractor.records_by_file_name("bad.xlsx").await.unwrap().is_empty());
    }
}
