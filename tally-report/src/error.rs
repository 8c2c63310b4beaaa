use thiserror::Error;

use tally_ingest::IngestError;

/// Errors raised while loading data or producing a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The chart backend failed to draw.
    #[error("Chart rendering failed: {0}")]
    Render(String),

    /// A renderer returned bytes that are not a PNG image.
    #[error("Chart {chart:?} is not a PNG image ({len} bytes)")]
    InvalidImage { chart: String, len: usize },

    /// A rendered bitmap could not be encoded as PNG.
    #[error("Failed to encode chart image: {0}")]
    Encode(#[from] image::ImageError),

    /// The workbook could not be built or saved.
    #[error("Failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

pub type Result<T> = std::result::Result<T, ReportError>;
