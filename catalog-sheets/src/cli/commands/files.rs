//! `files` commands

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use catalog_sheets::App;

#[derive(Subcommand, Debug)]
pub enum FilesCommands {
    /// Show metadata of a stored file
    Info { id: String },
    /// Mark a stored file deleted
    Delete { id: String },
}

pub async fn handle_files_command(cmd: FilesCommands, app: &App) -> Result<()> {
    match cmd {
        FilesCommands::Info { id } => {
            let Some(info) = app.files.file_info(&id).await? else {
                anyhow::bail!("File not found with id: {}", id);
            };

            println!("{} {}", "File".bold(), info.id);
            println!("  Name:        {}", info.file_name.cyan());
            println!("  Type:        {}", info.file_type);
            println!("  Size:        {} bytes", info.size);
            println!("  Stored as:   {}", info.storage_path);
            println!("  Uploaded by: {}", info.uploaded_by.as_deref().unwrap_or("-"));
            println!("  Uploaded:    {}", info.upload_date);
            println!("  Modified:    {}", info.last_modified_date);
            println!("  Status:      {}", info.status);
        }
        FilesCommands::Delete { id } => {
            if app.files.delete_file(&id).await? {
                println!("{} {}", "Deleted".bright_green(), id);
            } else {
                println!("{} {}", "No file with id".yellow(), id);
            }
        }
    }

    Ok(())
}
