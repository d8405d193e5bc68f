//! `extract` and `records` commands

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::*;

use catalog_sheets::App;
use catalog_sheets::extraction::{CellRecord, ProcessingStatus};
use catalog_sheets::payload::FilePayload;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Workbook to extract
    pub file: PathBuf,

    /// Store the file and save the records
    #[arg(long)]
    pub save: bool,

    /// Identity stamped on the records
    #[arg(long)]
    pub user: Option<String>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RecordsArgs {
    /// Records extracted from this file name
    #[arg(long, conflicts_with = "status")]
    pub file_name: Option<String>,

    /// Records with this status (e.g. PROCESSED)
    #[arg(long)]
    pub status: Option<ProcessingStatus>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_extract_command(args: ExtractArgs, app: &App) -> Result<()> {
    let payload = FilePayload::from_path(&args.file, None).await?;

    if args.save {
        let summary = app.extractor.process_and_save(&payload).await?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary).context("Failed to format JSON output")?);
        } else {
            println!(
                "{} {} records from {} (file id {})",
                summary.status.bright_green(),
                summary.record_count,
                summary.file_name.cyan(),
                summary.file_id.bold()
            );
        }
        return Ok(());
    }

    let records = app.extractor.process_async(payload).await?;
    print_records(&records, args.json)
}

pub async fn handle_records_command(args: RecordsArgs, app: &App) -> Result<()> {
    let records = match (args.file_name, args.status) {
        (Some(file_name), _) => app.extractor.records_by_file_name(&file_name).await?,
        (None, Some(status)) => app.extractor.records_by_status(status).await?,
        (None, None) => bail!("Either --file-name or --status is required"),
    };

    print_records(&records, args.json)
}

fn print_records(records: &[CellRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records).context("Failed to format JSON output")?);
        return Ok(());
    }

    for record in records {
        println!(
            "{}!{}{}  {}",
            record.sheet_name.dimmed(),
            record.column_name,
            record.row_number,
            record.cell_value
        );
    }
    println!("{} records", records.len().to_string().bold());

    Ok(())
}
