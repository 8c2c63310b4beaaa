//! tally-ingest: statement loading (CSV / spreadsheet), locale parsing and ledger normalization.

pub mod columns;
pub mod error;
pub mod locale;
pub mod normalize;
pub mod readers;
pub mod sample;
pub mod table;

pub use columns::ColumnMap;
pub use error::{IngestError, Result};
pub use normalize::{load_ledger, Normalized, Normalizer};
pub use readers::{load_table, CsvReader, SourceFormat, SpreadsheetReader, TableReader};
pub use table::{Cell, RawTable};
