//! Native spreadsheet exports (.xlsx / .xls), first worksheet only.

use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::columns::ColumnMap;
use crate::error::{IngestError, Result};
use crate::table::{Cell, RawTable};

use super::TableReader;

/// Reads the first worksheet; row 1 is the header.
///
/// Date columns keep native spreadsheet dates and fall back to DD/MM/YYYY
/// parsing when the export stored them as text.
#[derive(Debug, Clone)]
pub struct SpreadsheetReader {
    columns: ColumnMap,
}

impl SpreadsheetReader {
    pub fn new(columns: ColumnMap) -> Self {
        Self { columns }
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Int(i) => Cell::Number(Decimal::from(*i)),
        Data::Float(f) => Decimal::from_f64(*f)
            .map(Cell::Number)
            .unwrap_or_else(|| Cell::Text(f.to_string())),
        other => match other.as_date() {
            Some(date) => Cell::Date(date),
            None => Cell::text(&other.to_string()),
        },
    }
}

impl TableReader for SpreadsheetReader {
    fn read(&self, path: &Path) -> Result<RawTable> {
        let spreadsheet_err = |source: calamine::Error| IngestError::Spreadsheet {
            path: path.to_path_buf(),
            source,
        };

        let mut workbook = open_workbook_auto(path).map_err(spreadsheet_err)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| IngestError::EmptyWorkbook(path.to_path_buf()))?
            .map_err(spreadsheet_err)?;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|r| r.iter().map(|c| c.to_string().trim().to_string()).collect())
            .unwrap_or_default();
        let mut table = RawTable::new(headers);
        for name in [&self.columns.posting_date, &self.columns.value_date] {
            table.require_column(name)?;
        }

        for (idx, row) in rows.enumerate() {
            let row_no = idx + 1;
            let mut cells = Vec::with_capacity(table.headers().len());
            for (col, name) in table.headers().iter().enumerate() {
                let cell = row.get(col).map(cell_from_data).unwrap_or(Cell::Empty);
                if self.columns.is_date_column(name) {
                    cells.push(Cell::Date(cell.require_date(row_no, name)?));
                } else {
                    cells.push(cell);
                }
            }
            table.push_row(cells);
        }

        tracing::debug!(path = %path.display(), rows = table.len(), "read worksheet");
        Ok(table)
    }
}
