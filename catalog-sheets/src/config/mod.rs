//! Application configuration
//!
//! Loaded from `<config_dir>/catalog-sheets/config.toml` when present, then
//! overridden by environment variables (a `.env` file is honoured).

pub mod repository;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

const APP_DIR: &str = "catalog-sheets";

pub const DATABASE_ENV: &str = "CATALOG_SHEETS_DATABASE";
pub const UPLOAD_DIR_ENV: &str = "CATALOG_SHEETS_UPLOAD_DIR";
pub const STORAGE_DIR_ENV: &str = "CATALOG_SHEETS_STORAGE_DIR";
pub const USER_ENV: &str = "CATALOG_SHEETS_USER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database: PathBuf,
    /// Where imported workbooks are kept
    pub upload_dir: PathBuf,
    /// Root of the extraction file store
    pub storage_dir: PathBuf,
    /// Identity stamped on extracted records
    pub user: Option<String>,
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Default for Config {
    fn default() -> Self {
        let data = data_dir();
        Self {
            database: data.join("catalog.db"),
            upload_dir: dirs::download_dir().unwrap_or_else(|| data.join("uploads")),
            storage_dir: data.join("files"),
            user: None,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Load the config file (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(&Self::default_path())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a config file, falling back to defaults when it does not exist
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(database) = non_empty(DATABASE_ENV) {
            self.database = PathBuf::from(database);
        }
        if let Some(dir) = non_empty(UPLOAD_DIR_ENV) {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty(STORAGE_DIR_ENV) {
            self.storage_dir = PathBuf::from(dir);
        }
        if let Some(user) = non_empty(USER_ENV) {
            self.user = Some(user);
        }
    }

    /// Open the configured database
    pub async fn connect(&self) -> Result<SqlitePool> {
        repository::connect(&self.database).await
    }
}
