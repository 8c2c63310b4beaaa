//! Row-oriented table produced by the readers, before normalization.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{IngestError, Result};
use crate::locale::{parse_dmy_date, DATE_FORMAT};

/// One typed source cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(Decimal),
    Date(NaiveDate),
}

impl Cell {
    /// Build a cell from raw text; blank input becomes `Empty`.
    pub fn text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Typed dates pass through; text is parsed as DD/MM/YYYY.
    pub fn as_dmy_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_dmy_date(s),
            Cell::Empty | Cell::Number(_) => None,
        }
    }

    /// Resolve a date-column cell, failing with the row/column location.
    pub fn require_date(&self, row: usize, column: &str) -> Result<NaiveDate> {
        self.as_dmy_date().ok_or_else(|| IngestError::InvalidDate {
            row,
            column: column.to_string(),
            value: self.to_text(),
        })
    }

    /// Render the cell as pass-through text.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding short rows with `Empty` and dropping cells past the header width.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.headers.len(), Cell::Empty);
        self.rows.push(cells);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| IngestError::MissingColumn(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_push_row_pads_and_truncates() {
        let mut table = RawTable::new(headers(&["a", "b", "c"]));
        table.push_row(vec![Cell::text("1")]);
        table.push_row(vec![Cell::text("1"), Cell::text("2"), Cell::text("3"), Cell::text("4")]);
        assert_eq!(table.rows()[0], vec![Cell::Text("1".into()), Cell::Empty, Cell::Empty]);
        assert_eq!(table.rows()[1].len(), 3);
    }

    #[test]
    fn test_require_column() {
        let table = RawTable::new(headers(&["Dare", "Avere"]));
        assert_eq!(table.require_column("Avere").unwrap(), 1);
        assert!(matches!(
            table.require_column("Valuta"),
            Err(IngestError::MissingColumn(name)) if name == "Valuta"
        ));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(Cell::text("   "), Cell::Empty);
        assert_eq!(Cell::text(" POS "), Cell::Text("POS".into()));
        assert_eq!(Cell::Number(dec!(-30.00)).to_text(), "-30.00");
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(Cell::Date(date).to_text(), "07/03/2025");
    }

    #[test]
    fn test_require_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        assert_eq!(Cell::Date(date).require_date(1, "Valuta").unwrap(), date);
        assert_eq!(Cell::text("12/03/2025").require_date(1, "Valuta").unwrap(), date);

        let err = Cell::Number(dec!(45728)).require_date(3, "Valuta").unwrap_err();
        assert!(matches!(err, IngestError::InvalidDate { row: 3, .. }));
        assert!(Cell::Empty.require_date(1, "Valuta").is_err());
    }
}
