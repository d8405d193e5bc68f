//! Write a single-sheet xlsx workbook from typed rows

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::CellValue;

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const TEXT_FORMAT: &str = "@";

/// Formats shared by every cell of a sheet
struct CellFormats {
    date: Format,
    blank: Format,
}

impl CellFormats {
    fn new() -> Self {
        Self {
            date: Format::new().set_num_format(DATE_FORMAT),
            blank: Format::new().set_num_format(TEXT_FORMAT),
        }
    }
}

/// Write a header row followed by data rows into one named sheet
///
/// Returns the serialized workbook. Empty values are written as styled blank
/// cells so the row keeps one present cell per value.
pub fn write_workbook(sheet_name: &str, header: &[&str], rows: &[Vec<CellValue>]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let formats = CellFormats::new();

    worksheet
        .set_name(sheet_name)
        .with_context(|| format!("Invalid sheet name: {}", sheet_name))?;

    // Write header
    for (col, name) in header.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }

    // Write rows
    for (row_idx, values) in rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col, value) in values.iter().enumerate() {
            write_value(worksheet, &formats, row, col as u16, value)?;
        }
    }

    workbook
        .save_to_buffer()
        .context("Failed to serialize Excel workbook")
}

fn write_value(
    ws: &mut Worksheet,
    formats: &CellFormats,
    row: u32,
    col: u16,
    value: &CellValue,
) -> Result<()> {
    match value {
        CellValue::Empty => {
            ws.write_blank(row, col, &formats.blank)?;
        }
        CellValue::String(s) => {
            ws.write_string(row, col, s)?;
        }
        CellValue::Number(n) => {
            ws.write_number(row, col, *n)?;
        }
        CellValue::Bool(b) => {
            ws.write_boolean(row, col, *b)?;
        }
        CellValue::Date(dt) => {
            ws.write_datetime_with_format(row, col, dt, &formats.date)?;
        }
        CellValue::Formula(f) => {
            ws.write_formula(row, col, f.as_str())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::read_workbook;

    #[test]
    fn test_header_and_numeric_cells() {
        let rows = vec![
            vec![CellValue::Number(1.0), CellValue::from("Widget"), CellValue::Number(9.99)],
            vec![CellValue::Empty, CellValue::from("Gadget"), CellValue::Bool(false)],
        ];
        let bytes = write_workbook("Items", &["Id", "Name", "Price"], &rows).unwrap();

        let workbook = read_workbook(&bytes).unwrap();
        let sheet = workbook.sheet("Items").unwrap();
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[0].get(2), Some(&CellValue::from("Price")));
        assert_eq!(sheet.rows[1].get(0), Some(&CellValue::Number(1.0)));
        assert_eq!(sheet.rows[1].get(2), Some(&CellValue::Number(9.99)));

        // Empty stays present so later cells keep their position
        assert_eq!(sheet.rows[2].cells.len(), 3);
        assert_eq!(sheet.rows[2].get(0), Some(&CellValue::Empty));
        assert_eq!(sheet.rows[2].get(2), Some(&CellValue::Bool(false)));
    }

    #[test]
    fn test_header_only() {
        let bytes = write_workbook("Items", &["A", "B"], &[]).unwrap();
        let workbook = read_workbook(&bytes).unwrap();
        assert_eq!(workbook.sheets.len(), 1);
        assert_eq!(workbook.sheets[0].rows.len(), 1);
    }

    #[test]
    fn test_invalid_sheet_name() {
        assert!(write_workbook("bad[name]", &["A"], &[]).is_err());
    }
}
