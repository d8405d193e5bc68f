//! Decode the `Products` sheet into candidate rows
//!
//! Slots are Id, Name, Description, Price, Quantity. Only cells that are
//! present in a row are visited, and the n-th present cell fills the n-th slot
//! whatever its column. A gap inside a row therefore shifts the following
//! cells left; missing trailing cells leave their slots `None`. Numeric slots
//! ignore cells that are not plain numbers instead of reporting them.

use anyhow::{Result, bail};

use super::ProductRow;
use crate::sheets::{CellValue, Row, Workbook};

pub const SHEET_NAME: &str = "Products";
pub const HEADERS: [&str; 5] = ["Id", "Name", "Description", "Price", "Quantity"];

mod slot {
    pub const ID: usize = 0;
    pub const NAME: usize = 1;
    pub const DESCRIPTION: usize = 2;
    pub const PRICE: usize = 3;
    pub const QUANTITY: usize = 4;
}

/// Decode every data row of the `Products` sheet, skipping the header row
pub fn decode_products(workbook: &Workbook) -> Result<Vec<ProductRow>> {
    let sheet = match workbook.sheet(SHEET_NAME) {
        Some(sheet) => sheet,
        None => bail!("Sheet '{}' not found", SHEET_NAME),
    };

    let products: Vec<ProductRow> = sheet.rows.iter().skip(1).map(decode_row).collect();
    log::debug!("Decoded {} product rows", products.len());

    Ok(products)
}

fn decode_row(row: &Row) -> ProductRow {
    let mut product = ProductRow::default();

    for (index, cell) in row.cells.iter().enumerate() {
        match index {
            slot::ID => product.id = cell.value.as_number().map(|n| n as i64),
            slot::NAME => product.name = Some(text(&cell.value)),
            slot::DESCRIPTION => product.description = Some(text(&cell.value)),
            slot::PRICE => product.price = cell.value.as_number(),
            slot::QUANTITY => product.quantity = cell.value.as_number().map(|n| n as i64),
            _ => break,
        }
    }

    product
}

fn text(value: &CellValue) -> String {
    value.to_string()
}
