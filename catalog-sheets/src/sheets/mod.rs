//! Workbook codec: xlsx bytes <-> in-memory grid of typed cells

pub mod cell;
pub mod column;
pub mod grid;
mod reader;
mod writer;

pub use cell::CellValue;
pub use column::{column_index, column_label};
pub use grid::{Cell, Row, Sheet, Workbook};
pub use reader::read_workbook;
pub use writer::write_workbook;

/// Content type of an xlsx workbook
pub const EXCEL_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
