pub mod export;
pub mod extract;
pub mod files;
pub mod import;
pub mod upload;

pub use export::{ExportArgs, TemplateArgs};
pub use extract::{ExtractArgs, RecordsArgs};
pub use files::FilesCommands;
pub use import::ImportArgs;
pub use upload::UploadCommands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::*;

/// Write bytes to `out`, or to `default_name` in the current directory
pub(crate) fn write_output(out: Option<PathBuf>, default_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = out.unwrap_or_else(|| PathBuf::from(default_name));
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write output to: {}", path.display()))?;
    Ok(path)
}

pub(crate) fn print_saved(label: &str, path: &Path) {
    println!(
        "{} {}",
        label.bright_green(),
        path.display().to_string().cyan()
    );
}
