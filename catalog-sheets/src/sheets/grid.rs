//! In-memory workbook grid
//!
//! Rows and cells are sparse: only cells that carry a value (or a formula) are
//! present, and a row without any such cell does not appear at all.

use super::CellValue;

/// A present cell and its zero-based column
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub column: usize,
    pub value: CellValue,
}

/// A row of present cells, ordered by column
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Zero-based row index within the sheet
    pub index: usize,
    pub cells: Vec<Cell>,
}

impl Row {
    /// Cell at a given column, if present
    pub fn get(&self, column: usize) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|c| c.column == column)
            .map(|c| &c.value)
    }
}

/// A named sheet, rows in ascending order
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

/// All sheets of a workbook in workbook order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Find a sheet by exact name
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Total number of present cells across all sheets
    pub fn cell_count(&self) -> usize {
        self.sheets
            .iter()
            .flat_map(|s| s.rows.iter())
            .map(|r| r.cells.len())
            .sum()
    }
}
