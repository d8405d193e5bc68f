//! Command line interface

pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use catalog_sheets::App;
use catalog_sheets::config::Config;

use commands::{
    ExportArgs, ExtractArgs, FilesCommands, ImportArgs, RecordsArgs, TemplateArgs, UploadCommands,
};

#[derive(Parser, Debug)]
#[command(
    name = "catalog-sheets",
    version,
    about = "Import and export a product catalog as Excel workbooks"
)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import products from a workbook
    Import(ImportArgs),
    /// Export the whole catalog to a workbook
    Export(ExportArgs),
    /// Write an empty import template
    Template(TemplateArgs),
    /// Flatten every cell of a workbook into records
    Extract(ExtractArgs),
    /// List saved cell records
    Records(RecordsArgs),
    /// Inspect previous imports
    #[command(subcommand)]
    Upload(UploadCommands),
    /// Manage stored files
    #[command(subcommand)]
    Files(FilesCommands),
}

pub async fn run(cli: Cli, mut config: Config) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let command = match cli.command {
        // Template generation needs no database
        Commands::Template(args) => return commands::export::handle_template_command(args).await,
        command => command,
    };

    if let Commands::Extract(ExtractArgs { user: Some(user), .. }) = &command {
        config.user = Some(user.clone());
    }

    let app = App::open(&config).await?;

    match command {
        Commands::Import(args) => commands::import::handle_import_command(args, &app).await,
        Commands::Export(args) => commands::export::handle_export_command(args, &app).await,
        Commands::Template(args) => commands::export::handle_template_command(args).await,
        Commands::Extract(args) => commands::extract::handle_extract_command(args, &app).await,
        Commands::Records(args) => commands::extract::handle_records_command(args, &app).await,
        Commands::Upload(cmd) => commands::upload::handle_upload_command(cmd, &app).await,
        Commands::Files(cmd) => commands::files::handle_files_command(cmd, &app).await,
    }
}
