//! Files on the local disk, metadata in SQLite

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{FileMetadata, FileStatus, FileStore};
use crate::config::repository::files;
use crate::payload::FilePayload;

pub struct LocalFileStore {
    root: PathBuf,
    pool: SqlitePool,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>, pool: SqlitePool) -> Self {
        Self {
            root: root.into(),
            pool,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Last path component of an uploaded name, refusing parent references
fn clean_file_name(name: &str) -> Result<String> {
    let cleaned = name.replace('\\', "/");
    if cleaned.split('/').any(|part| part.trim() == "..") {
        bail!("Invalid file name: {}", name);
    }

    let base = cleaned.rsplit('/').next().unwrap_or_default().trim();
    if base.is_empty() {
        bail!("Invalid file name: {}", name);
    }
    Ok(base.to_string())
}

fn extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => &file_name[pos..],
        _ => "",
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store_file(&self, file: &FilePayload, uploaded_by: &str) -> Result<FileMetadata> {
        let file_name = clean_file_name(&file.file_name)?;
        let id = Uuid::new_v4().to_string();
        let storage_path = format!("{}{}", Uuid::new_v4(), extension(&file_name));

        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create storage directory: {}", self.root.display()))?;

        let target = self.root.join(&storage_path);
        tokio::fs::write(&target, &file.bytes)
            .await
            .with_context(|| format!("Failed to store file: {}", target.display()))?;

        let now = Utc::now();
        let metadata = FileMetadata {
            id,
            file_name: file_name.clone(),
            file_type: file.content_type.clone(),
            size: file.size(),
            storage_path,
            original_file_name: file_name,
            uploaded_by: Some(uploaded_by.to_string()),
            upload_date: now,
            last_modified_date: now,
            status: FileStatus::Active,
        };
        files::insert_file(&self.pool, &metadata).await?;
        log::info!("Stored file '{}' as {}", metadata.file_name, metadata.storage_path);

        Ok(metadata)
    }

    async fn load_file(&self, id: &str) -> Result<Vec<u8>> {
        let metadata = match files::get_file(&self.pool, id).await? {
            Some(m) if m.status == FileStatus::Active => m,
            _ => bail!("File not found with id: {}", id),
        };

        let path = self.root.join(&metadata.storage_path);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read stored file: {}", path.display()))
    }

    async fn delete_file(&self, id: &str) -> Result<bool> {
        files::set_file_status(&self.pool, id, FileStatus::Deleted).await
    }

    async fn file_info(&self, id: &str) -> Result<Option<FileMetadata>> {
        files::get_file(&self.pool, id).await
    }
}
