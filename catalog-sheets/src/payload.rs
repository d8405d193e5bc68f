//! An uploaded file as received from the caller

use std::path::Path;

use anyhow::{Context, Result};

use crate::sheets::EXCEL_CONTENT_TYPE;

/// Named file payload: original name, declared content type and bytes
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Convenience for an xlsx payload
    pub fn excel(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(file_name, EXCEL_CONTENT_TYPE, bytes)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Read a local file; the content type is guessed from the extension unless given
    pub async fn from_path(path: &Path, content_type: Option<&str>) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("Path has no file name: {}", path.display()))?;

        let content_type = content_type
            .map(str::to_string)
            .unwrap_or_else(|| content_type_for(&file_name).to_string());

        Ok(Self::new(file_name, content_type, bytes))
    }
}

/// Content type for a file name, by extension
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" => EXCEL_CONTENT_TYPE,
        "xls" => "application/vnd.ms-excel",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("Products.XLSX"), EXCEL_CONTENT_TYPE);
        assert_eq!(content_type_for("old.xls"), "application/vnd.ms-excel");
        assert_eq!(content_type_for("data.csv"), "text/csv");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.xlsx");
        std::fs::write(&path, b"abc").unwrap();

        let payload = FilePayload::from_path(&path, None).await.unwrap();
        assert_eq!(payload.file_name, "catalog.xlsx");
        assert_eq!(payload.content_type, EXCEL_CONTENT_TYPE);
        assert_eq!(payload.size(), 3);

        let forced = FilePayload::from_path(&path, Some("text/plain")).await.unwrap();
        assert_eq!(forced.content_type, "text/plain");
    }
}
