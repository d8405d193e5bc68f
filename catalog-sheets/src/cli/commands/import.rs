//! `import` command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use catalog_sheets::App;
use catalog_sheets::payload::FilePayload;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Workbook to import
    pub file: PathBuf,

    /// Declared content type (guessed from the extension otherwise)
    #[arg(long)]
    pub content_type: Option<String>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_import_command(args: ImportArgs, app: &App) -> Result<()> {
    let payload = FilePayload::from_path(&args.file, args.content_type.as_deref()).await?;

    let outcome = match app.tracker.import_products(&payload).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.may_have_partial_results() {
                eprintln!("{}", "Some rows may already have been saved".yellow());
            }
            return Err(e.into());
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&outcome).context("Failed to format JSON output")?;
        println!("{}", json);
        return Ok(());
    }

    println!(
        "Imported {}: {} total, {} succeeded, {} failed",
        payload.file_name.cyan(),
        outcome.total_records,
        outcome.successful_imports.to_string().bright_green(),
        if outcome.failed_imports > 0 {
            outcome.failed_imports.to_string().bright_red()
        } else {
            outcome.failed_imports.to_string().normal()
        }
    );

    if let Some(id) = outcome.file_id {
        println!("Upload id: {}", id.to_string().bold());
    }
    for message in &outcome.error_messages {
        println!("  {}", message.yellow());
    }

    Ok(())
}
