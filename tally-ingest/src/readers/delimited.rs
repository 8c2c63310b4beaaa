//! Delimited-text statement exports in European locale.
//!
//! Example:
//! Data contabile,Valuta,Dare,Avere,Divisa,Causale,Descrizione,Categoria,Tag
//! 12/03/2025,10/03/2025,"-100,00",,EUR,VH,Pagamento POS,Ristoranti e bar,

use std::io;
use std::path::Path;

use crate::columns::ColumnMap;
use crate::error::{IngestError, Result};
use crate::locale::parse_european_decimal;
use crate::table::{Cell, RawTable};

use super::TableReader;

/// Comma-delimited reader: "," separates fields and is also the decimal mark
/// (amounts containing one are quoted). Date columns are DD/MM/YYYY.
#[derive(Debug, Clone)]
pub struct CsvReader {
    columns: ColumnMap,
    delimiter: u8,
}

impl CsvReader {
    pub fn new(columns: ColumnMap) -> Self {
        Self {
            columns,
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read from any byte source; `origin` is only used in error messages.
    pub fn read_from<R: io::Read>(&self, reader: R, origin: &Path) -> Result<RawTable> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(reader);
        let csv_err = |source: csv::Error| IngestError::Csv {
            path: origin.to_path_buf(),
            source,
        };

        let headers: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut table = RawTable::new(headers);
        for name in [&self.columns.posting_date, &self.columns.value_date] {
            table.require_column(name)?;
        }

        for (idx, result) in rdr.records().enumerate() {
            let record = result.map_err(csv_err)?;
            let row = idx + 1;
            let mut cells = Vec::with_capacity(table.headers().len());
            for (col, name) in table.headers().iter().enumerate() {
                let cell = Cell::text(record.get(col).unwrap_or(""));
                cells.push(self.type_cell(cell, row, name)?);
            }
            table.push_row(cells);
        }

        Ok(table)
    }

    fn type_cell(&self, cell: Cell, row: usize, column: &str) -> Result<Cell> {
        if self.columns.is_date_column(column) {
            return cell.require_date(row, column).map(Cell::Date);
        }
        if self.columns.is_amount_column(column) {
            // Unparseable amounts stay as text; the normalizer decides what they are worth.
            if let Cell::Text(raw) = &cell {
                if let Some(value) = parse_european_decimal(raw) {
                    return Ok(Cell::Number(value));
                }
            }
        }
        Ok(cell)
    }
}

impl TableReader for CsvReader {
    fn read(&self, path: &Path) -> Result<RawTable> {
        let file = std::fs::File::open(path).map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source: source.into(),
        })?;
        self.read_from(io::BufReader::new(file), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "Data contabile,Valuta,Dare,Avere,Divisa,Causale,Descrizione,Categoria,Tag
12/03/2025,10/03/2025,\"-100,00\",,EUR,VH,Pagamento POS,Ristoranti e bar,
12/03/2025,07/03/2025,\"-30,00\",,EUR,0U,PAGAMENTO VISA,Arte e Cultura,
11/03/2025,11/03/2025,\"-11,50\",,EUR,TE,ADDEBITO DIRETTO,Utenze";

    fn read(text: &str) -> Result<RawTable> {
        CsvReader::new(ColumnMap::default()).read_from(text.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn test_reads_sample_rows() {
        let table = read(SAMPLE).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.headers().len(), 9);

        let first = &table.rows()[0];
        assert_eq!(first[0], Cell::Date(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()));
        assert_eq!(first[1], Cell::Date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
        assert_eq!(first[2], Cell::Number(dec!(-100.00)));
        assert_eq!(first[3], Cell::Empty);
        assert_eq!(first[7], Cell::Text("Ristoranti e bar".into()));
    }

    #[test]
    fn test_short_last_row_is_padded() {
        let table = read(SAMPLE).unwrap();
        let last = &table.rows()[2];
        assert_eq!(last.len(), 9);
        assert_eq!(last[7], Cell::Text("Utenze".into()));
        assert_eq!(last[8], Cell::Empty);
    }

    #[test]
    fn test_thousands_separator_in_credit() {
        let text = "Data contabile,Valuta,Dare,Avere\n01/04/2025,01/04/2025,,\"1.850,00\"\n";
        let table = read(text).unwrap();
        assert_eq!(table.rows()[0][3], Cell::Number(dec!(1850.00)));
    }

    #[test]
    fn test_malformed_amount_kept_as_text() {
        let text = "Data contabile,Valuta,Dare,Avere\n01/04/2025,01/04/2025,n/d,\n";
        let table = read(text).unwrap();
        assert_eq!(table.rows()[0][2], Cell::Text("n/d".into()));
    }

    #[test]
    fn test_invalid_date_reports_location() {
        let text = "Data contabile,Valuta,Dare,Avere\n01/04/2025,01/04/2025,\"-1,00\",\n2025-04-02,02/04/2025,\"-2,00\",\n";
        let err = read(text).unwrap_err();
        match err {
            IngestError::InvalidDate { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Data contabile");
                assert_eq!(value, "2025-04-02");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_date_column() {
        let err = read("Valuta,Dare,Avere\n01/04/2025,,\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(name) if name == "Data contabile"));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let text = "Data contabile;Valuta;Dare;Avere\n01/04/2025;01/04/2025;-5,25;\n";
        let table = CsvReader::new(ColumnMap::default())
            .with_delimiter(b';')
            .read_from(text.as_bytes(), Path::new("inline.csv"))
            .unwrap();
        assert_eq!(table.rows()[0][2], Cell::Number(dec!(-5.25)));
    }

    #[test]
    fn test_missing_file_is_csv_error() {
        let err = CsvReader::new(ColumnMap::default())
            .read(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, IngestError::Csv { .. }));
    }
}
