//! Typed cell values and their canonical string form

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single cell value as read from (or written to) a workbook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    /// Present but valueless (a styled blank or an error cell)
    #[default]
    Empty,
    /// Shared or inline string
    String(String),
    /// Numeric cell without a date format
    Number(f64),
    /// Numeric cell carrying a date/time format
    Date(NaiveDateTime),
    /// Boolean cell
    Bool(bool),
    /// Formula text, never evaluated
    Formula(String),
}

impl CellValue {
    /// Check if this value is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric payload, only for plain numeric cells
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Kind name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::String(_) => "string",
            CellValue::Number(_) => "numeric",
            CellValue::Date(_) => "date",
            CellValue::Bool(_) => "boolean",
            CellValue::Formula(_) => "formula",
        }
    }
}

/// Canonical string form of a cell
impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Date(dt) => write!(f, "{}", dt),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Formula(formula) => write!(f, "{}", formula),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

/// Shortest decimal that reads back as the same f64; whole numbers keep `.0`
fn format_number(n: f64) -> String {
    format!("{:?}", n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_canonical_strings() {
        assert_eq!(CellValue::Number(12.5).to_string(), "12.5");
        assert_eq!(CellValue::Number(5.0).to_string(), "5.0");
        assert_eq!(CellValue::Number(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::Bool(false).to_string(), "false");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::from("Widget").to_string(), "Widget");
        assert_eq!(CellValue::Formula("SUM(A1:A3)".into()).to_string(), "SUM(A1:A3)");
    }

    #[test]
    fn test_date_string() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(CellValue::Date(dt).to_string(), "2024-01-15 08:30:00");
    }

    #[test]
    fn test_as_number_only_for_plain_numbers() {
        assert_eq!(CellValue::Number(3.0).as_number(), Some(3.0));
        assert_eq!(CellValue::from("3").as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), None);
        assert_eq!(CellValue::Formula("1+2".into()).as_number(), None);
    }

    #[test]
    fn test_default_is_empty() {
        assert_eq!(CellValue::default(), CellValue::Empty);
        assert_eq!(CellValue::default().to_string(), "");
    }
}
