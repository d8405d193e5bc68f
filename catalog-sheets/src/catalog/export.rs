//! Export the catalog (or an empty template) as a workbook

use anyhow::Result;
use chrono::{DateTime, Local};

use super::decoder::{HEADERS, SHEET_NAME};
use super::{CatalogStore, Product};
use crate::sheets::{CellValue, write_workbook};

pub const TEMPLATE_FILE_NAME: &str = "products_template.xlsx";

/// A generated workbook and the name it should be saved under
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Write products to a `Products` sheet; no products gives a header-only sheet
///
/// Every slot is written, missing ones as blank cells, so a re-import sees
/// each value at its position.
pub fn products_to_workbook(products: &[Product]) -> Result<Vec<u8>> {
    let rows: Vec<Vec<CellValue>> = products.iter().map(product_row).collect();
    write_workbook(SHEET_NAME, &HEADERS, &rows)
}

fn product_row(product: &Product) -> Vec<CellValue> {
    vec![
        product.id.map(CellValue::from).unwrap_or_default(),
        CellValue::String(product.name.clone()),
        product
            .description
            .as_deref()
            .map(CellValue::from)
            .unwrap_or_default(),
        CellValue::Number(product.price),
        CellValue::from(product.quantity),
    ]
}

/// File name for an export taken at `now`
pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("products_{}.xlsx", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Export every product in the catalog
pub async fn export_products(store: &dyn CatalogStore) -> Result<ExportFile> {
    log::info!("Exporting all products to Excel");
    let products = store.find_all().await?;
    log::debug!("Found {} products for export", products.len());

    Ok(ExportFile {
        file_name: export_file_name(Local::now()),
        bytes: products_to_workbook(&products)?,
    })
}

/// Header-only workbook for filling in new products
pub fn download_template() -> Result<ExportFile> {
    log::info!("Generating Excel template");
    Ok(ExportFile {
        file_name: TEMPLATE_FILE_NAME.to_string(),
        bytes: products_to_workbook(&[])?,
    })
}
