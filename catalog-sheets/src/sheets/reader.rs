//! Read xlsx bytes into a sparse cell grid

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};

use super::{Cell, CellValue, Row, Sheet, Workbook};

/// Parse an xlsx workbook held in memory
pub fn read_workbook(bytes: &[u8]) -> Result<Workbook> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).context("Failed to open Excel workbook")?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for name in sheet_names {
        let sheet = read_sheet(&mut workbook, &name)?;
        log::debug!("Read sheet '{}' with {} rows", sheet.name, sheet.rows.len());
        sheets.push(sheet);
    }

    Ok(Workbook { sheets })
}

fn read_sheet<RS: Read + Seek>(workbook: &mut Xlsx<RS>, name: &str) -> Result<Sheet> {
    // Keyed by absolute (row, col); cells missing from the sheet xml never get an entry
    let mut cells: BTreeMap<(usize, usize), CellValue> = BTreeMap::new();

    // The cell reader also yields cells written without a value (styled blanks),
    // which `worksheet_range` would drop
    let mut reader = workbook
        .worksheet_cells_reader(name)
        .with_context(|| format!("Failed to read sheet: {}", name))?;
    while let Some(cell) = reader
        .next_cell()
        .with_context(|| format!("Failed to read cells of sheet: {}", name))?
    {
        let (row, col) = cell.get_position();
        let value = cell_value(&Data::from(cell.get_value().clone()));
        cells.insert((row as usize, col as usize), value);
    }
    drop(reader);

    let formulas = workbook
        .worksheet_formula(name)
        .with_context(|| format!("Failed to read formulas of sheet: {}", name))?;

    // A formula cell is reported as its formula, whatever it cached
    if let Some((start_row, start_col)) = formulas.start() {
        for (row, col, text) in formulas.used_cells() {
            if !text.is_empty() {
                cells.insert(
                    (start_row as usize + row, start_col as usize + col),
                    CellValue::Formula(text.clone()),
                );
            }
        }
    }

    let mut rows: Vec<Row> = Vec::new();
    for ((row_idx, column), value) in cells {
        match rows.last_mut() {
            Some(row) if row.index == row_idx => row.cells.push(Cell { column, value }),
            _ => rows.push(Row {
                index: row_idx,
                cells: vec![Cell { column, value }],
            }),
        }
    }

    Ok(Sheet {
        name: name.to_string(),
        rows,
    })
}

/// Convert a calamine cell that is present in the sheet
fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                return CellValue::Number(dt.as_f64());
            }
            dt.as_datetime()
                .map(CellValue::Date)
                .unwrap_or_else(|| CellValue::Number(dt.as_f64()))
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::String(s.clone())),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook as XlsxWorkbook};

    fn sample_bytes() -> Vec<u8> {
        let mut workbook = XlsxWorkbook::new();

        let first = workbook.add_worksheet();
        first.set_name("Data").unwrap();
        first.write_string(0, 0, "label").unwrap();
        first.write_number(0, 2, 12.5).unwrap();
        first.write_boolean(1, 1, true).unwrap();
        first.write_formula(2, 0, "=SUM(1,2)").unwrap();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let date = ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        first.write_datetime_with_format(3, 3, &date, &date_format).unwrap();

        let text_format = Format::new().set_num_format("@");
        first.write_blank(4, 1, &text_format).unwrap();

        let second = workbook.add_worksheet();
        second.set_name("Offset").unwrap();
        second.write_string(4, 1, "late").unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_reads_all_sheets_in_order() {
        let workbook = read_workbook(&sample_bytes()).unwrap();
        let names: Vec<_> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Data", "Offset"]);
    }

    #[test]
    fn test_sparse_cells_and_kinds() {
        let workbook = read_workbook(&sample_bytes()).unwrap();
        let data = workbook.sheet("Data").unwrap();

        assert_eq!(data.rows.len(), 5);

        let first = &data.rows[0];
        assert_eq!(first.index, 0);
        assert_eq!(first.cells.len(), 2, "absent B1 must not be synthesized");
        assert_eq!(first.get(0), Some(&CellValue::from("label")));
        assert_eq!(first.get(2), Some(&CellValue::Number(12.5)));
        assert_eq!(first.get(1), None);

        assert_eq!(data.rows[1].get(1), Some(&CellValue::Bool(true)));
        assert_eq!(
            data.rows[2].get(0),
            Some(&CellValue::Formula("SUM(1,2)".to_string()))
        );

        let date = data.rows[3].get(3).unwrap();
        assert!(matches!(date, CellValue::Date(_)), "got {:?}", date);
        assert!(date.to_string().starts_with("2024-01-15"));
    }

    #[test]
    fn test_styled_blank_is_present_and_empty() {
        let workbook = read_workbook(&sample_bytes()).unwrap();
        let data = workbook.sheet("Data").unwrap();

        let blank_row = &data.rows[4];
        assert_eq!(blank_row.index, 4);
        assert_eq!(blank_row.cells.len(), 1);
        assert_eq!(blank_row.get(1), Some(&CellValue::Empty));
    }

    #[test]
    fn test_positions_are_absolute() {
        let workbook = read_workbook(&sample_bytes()).unwrap();
        let offset = workbook.sheet("Offset").unwrap();

        assert_eq!(offset.rows.len(), 1);
        assert_eq!(offset.rows[0].index, 4);
        assert_eq!(offset.rows[0].cells[0].column, 1);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(read_workbook(b"not a workbook").is_err());
    }
}
