//! `export` and `template` commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use catalog_sheets::App;
use catalog_sheets::catalog::{download_template, export_products};

use super::{print_saved, write_output};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output path (defaults to a timestamped name)
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Output path (defaults to products_template.xlsx)
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

pub async fn handle_export_command(args: ExportArgs, app: &App) -> Result<()> {
    let export = export_products(app.catalog.as_ref()).await?;
    let path = write_output(args.out, &export.file_name, &export.bytes)?;
    print_saved("Exported catalog to", &path);
    Ok(())
}

pub async fn handle_template_command(args: TemplateArgs) -> Result<()> {
    let template = download_template()?;
    let path = write_output(args.out, &template.file_name, &template.bytes)?;
    print_saved("Template written to", &path);
    Ok(())
}
