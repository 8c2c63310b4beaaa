//! Raw table -> Ledger.
//!
//! Reconciles the debit/credit pair into one signed amount, derives the period
//! key and keeps or drops the optional columns.

use std::path::Path;

use rust_decimal::Decimal;
use tally_core::{Ledger, Transaction};
use tracing::{info, warn};

use crate::columns::ColumnMap;
use crate::error::Result;
use crate::locale::{is_plausible_amount, parse_european_decimal};
use crate::readers::load_table;
use crate::table::{Cell, RawTable};

/// How a debit/credit cell was read.
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    Value(Decimal),
    /// Blank cell.
    Absent,
    /// Non-numeric content, treated as absent.
    Malformed(String),
}

impl Coercion {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Coercion::Value(v) => Some(*v),
            Coercion::Absent | Coercion::Malformed(_) => None,
        }
    }
}

/// Lenient amount rule: anything that is not a number counts as absent (and
/// therefore zero in the reconciled amount). Numbers beyond the accepted range
/// are malformed too. Malformed values are reported by the caller rather than
/// failing the load.
pub fn coerce_amount(cell: &Cell) -> Coercion {
    match cell {
        Cell::Number(n) if is_plausible_amount(*n) => Coercion::Value(*n),
        Cell::Number(n) => Coercion::Malformed(n.to_string()),
        Cell::Empty => Coercion::Absent,
        Cell::Text(s) => match parse_european_decimal(s) {
            Some(v) => Coercion::Value(v),
            None => Coercion::Malformed(s.clone()),
        },
        Cell::Date(d) => Coercion::Malformed(d.to_string()),
    }
}

/// A ledger plus what normalization had to paper over.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub ledger: Ledger,
    /// Number of non-empty debit/credit cells that were not numeric.
    pub coerced_values: usize,
}

struct Layout {
    posting_date: usize,
    value_date: usize,
    debit: usize,
    credit: usize,
    description: Option<usize>,
    category: Option<usize>,
    tag: Option<usize>,
    extras: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    columns: ColumnMap,
}

impl Normalizer {
    pub fn new(columns: ColumnMap) -> Self {
        Self { columns }
    }

    fn layout(&self, table: &RawTable) -> Result<Layout> {
        let cols = &self.columns;
        // Currency and reason only go away as a pair.
        let drop_optional = table.has_column(&cols.currency) && table.has_column(&cols.reason);
        let extras = table
            .headers()
            .iter()
            .enumerate()
            .filter(|(_, name)| !cols.is_core_column(name))
            .filter(|(_, name)| !(drop_optional && (**name == cols.currency || **name == cols.reason)))
            .map(|(idx, _)| idx)
            .collect();

        Ok(Layout {
            posting_date: table.require_column(&cols.posting_date)?,
            value_date: table.require_column(&cols.value_date)?,
            debit: table.require_column(&cols.debit)?,
            credit: table.require_column(&cols.credit)?,
            description: table.column_index(&cols.description),
            category: table.column_index(&cols.category),
            tag: table.column_index(&cols.tag),
            extras,
        })
    }

    pub fn normalize(&self, table: &RawTable) -> Result<Normalized> {
        let layout = self.layout(table)?;
        let text_at = |row: &[Cell], idx: Option<usize>| idx.map(|i| row[i].to_text()).unwrap_or_default();

        let mut coerced_values = 0;
        let mut transactions = Vec::with_capacity(table.len());
        for (idx, row) in table.rows().iter().enumerate() {
            let row = row.as_slice();
            let row_no = idx + 1;
            let posting_date = row[layout.posting_date].require_date(row_no, &self.columns.posting_date)?;
            let value_date = row[layout.value_date].require_date(row_no, &self.columns.value_date)?;

            let mut amount_of = |col: usize, name: &str| match coerce_amount(&row[col]) {
                Coercion::Malformed(raw) => {
                    warn!(row = row_no, column = name, value = %raw, "non-numeric amount treated as zero");
                    coerced_values += 1;
                    None
                }
                other => other.value(),
            };
            let debit = amount_of(layout.debit, self.columns.debit.as_str());
            let credit = amount_of(layout.credit, self.columns.credit.as_str());

            let extra = layout.extras.iter().map(|&i| row[i].to_text()).collect();
            transactions.push(
                Transaction::new(posting_date, value_date, debit, credit)
                    .with_description(text_at(row, layout.description))
                    .with_category(text_at(row, layout.category))
                    .with_tag(text_at(row, layout.tag))
                    .with_extra(extra),
            );
        }

        let extra_columns = layout
            .extras
            .iter()
            .map(|&i| table.headers()[i].clone())
            .collect();
        let ledger = Ledger::new(transactions, extra_columns);
        info!(rows = ledger.len(), coerced_values, "normalized ledger");
        Ok(Normalized {
            ledger,
            coerced_values,
        })
    }
}

/// Read `path` (format chosen by extension) and normalize it into a ledger.
pub fn load_ledger(path: &Path, columns: &ColumnMap) -> Result<Normalized> {
    let table = load_table(path, columns)?;
    Normalizer::new(columns.clone()).normalize(&table)
}
