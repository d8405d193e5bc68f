//! `upload` commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use catalog_sheets::App;
use catalog_sheets::uploads::UploadStatus;

use super::{print_saved, write_output};

#[derive(Subcommand, Debug)]
pub enum UploadCommands {
    /// Show the status of an import
    Show {
        id: i64,
    },
    /// Copy the stored workbook of an import
    Fetch {
        id: i64,
        /// Output path (defaults to the original file name)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

pub async fn handle_upload_command(cmd: UploadCommands, app: &App) -> Result<()> {
    match cmd {
        UploadCommands::Show { id } => {
            let Some(record) = app.tracker.find_upload(id).await? else {
                anyhow::bail!("Upload not found with id: {}", id);
            };

            let status = match record.status {
                UploadStatus::Completed => record.status.to_string().bright_green(),
                UploadStatus::Failed => record.status.to_string().bright_red(),
                _ => record.status.to_string().yellow(),
            };

            println!("{} {}", "Upload".bold(), id);
            println!("  File:      {}", record.original_filename.cyan());
            println!("  Stored as: {}", record.file_path.as_deref().unwrap_or("-"));
            println!("  Size:      {} bytes", record.file_size);
            println!("  Uploaded:  {}", record.uploaded_at);
            println!("  Status:    {}", status);
            println!(
                "  Records:   {} total, {} succeeded, {} failed",
                record.total_records,
                record.successful_records(),
                record.failed_records
            );
        }
        UploadCommands::Fetch { id, out } => {
            let (record, bytes) = app.tracker.load_uploaded_file(id).await?;
            let path = write_output(out, &record.original_filename, &bytes)?;
            print_saved("Saved upload to", &path);
        }
    }

    Ok(())
}
