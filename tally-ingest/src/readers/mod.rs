//! Table readers, selected by file extension.

mod delimited;
mod spreadsheet;

use std::path::Path;

use crate::columns::ColumnMap;
use crate::error::{IngestError, Result};
use crate::table::RawTable;

pub use self::delimited::CsvReader;
pub use self::spreadsheet::SpreadsheetReader;

/// Reads a statement file into a raw row table.
pub trait TableReader {
    fn read(&self, path: &Path) -> Result<RawTable>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.csv`
    Delimited,
    /// `.xlsx` / `.xls`
    Spreadsheet,
}

impl SourceFormat {
    pub fn detect(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(SourceFormat::Delimited),
            Some("xlsx") | Some("xls") => Ok(SourceFormat::Spreadsheet),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

fn delimiter_byte(columns: &ColumnMap) -> Result<u8> {
    u8::try_from(columns.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(IngestError::InvalidDelimiter(columns.delimiter))
}

/// Pick the reader for `path` based on its extension.
pub fn reader_for(path: &Path, columns: &ColumnMap) -> Result<Box<dyn TableReader>> {
    Ok(match SourceFormat::detect(path)? {
        SourceFormat::Delimited => {
            Box::new(CsvReader::new(columns.clone()).with_delimiter(delimiter_byte(columns)?))
        }
        SourceFormat::Spreadsheet => Box::new(SpreadsheetReader::new(columns.clone())),
    })
}

/// Read `path` with the reader matching its extension.
pub fn load_table(path: &Path, columns: &ColumnMap) -> Result<RawTable> {
    let table = reader_for(path, columns)?.read(path)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers().len(),
        "read raw table"
    );
    Ok(table)
}
