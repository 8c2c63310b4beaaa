use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading and normalizing a statement export.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The file extension is neither delimited text nor a spreadsheet.
    #[error("Unsupported file format: {}. Please use CSV or Excel.", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// A column the ledger cannot be built without is absent.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A date cell could not be read as DD/MM/YYYY.
    #[error("Invalid date {value:?} in column {column} at row {row} (expected DD/MM/YYYY)")]
    InvalidDate {
        row: usize,
        column: String,
        value: String,
    },

    /// The delimited file could not be opened or parsed.
    #[error("Failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The spreadsheet could not be opened or parsed.
    #[error("Failed to read spreadsheet {}: {source}", .path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// The spreadsheet has no worksheet to read.
    #[error("Spreadsheet {} contains no worksheets", .0.display())]
    EmptyWorkbook(PathBuf),

    /// The configured CSV delimiter cannot be used as a single-byte separator.
    #[error("Invalid CSV delimiter {0:?}: use a single ASCII character")]
    InvalidDelimiter(char),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
