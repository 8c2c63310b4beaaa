//! Session facade: load a statement once, then query or export it.

use std::path::Path;

use tally_core::{BasicStats, CashflowSummary, GroupSummary, Outcome, SessionState};
use tally_ingest::{load_ledger, ColumnMap, Normalized, Normalizer, RawTable};
use tracing::info;

use crate::error::Result;
use crate::render::{ChartRenderer, PlottersRenderer};
use crate::reporter::Reporter;
use crate::workbook::WorkbookWriter;
use crate::xlsx::XlsxWriter;

/// What a successful load brought in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows: usize,
    /// Non-numeric debit/credit cells that were read as zero.
    pub coerced_values: usize,
}

/// Holds the current session and the reporter used for exports.
///
/// Queries made before any successful load answer [`Outcome::NoData`]. A failed
/// load leaves the previous ledger in place.
#[derive(Debug)]
pub struct Tracker<R = PlottersRenderer, W = XlsxWriter> {
    columns: ColumnMap,
    state: SessionState,
    reporter: Reporter<R, W>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::with_columns(ColumnMap::default())
    }

    pub fn with_columns(columns: ColumnMap) -> Self {
        Self::with_reporter(columns, Reporter::default())
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ChartRenderer, W: WorkbookWriter> Tracker<R, W> {
    pub fn with_reporter(columns: ColumnMap, reporter: Reporter<R, W>) -> Self {
        Self {
            columns,
            state: SessionState::default(),
            reporter,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn reporter(&self) -> &Reporter<R, W> {
        &self.reporter
    }

    fn install(&mut self, normalized: Normalized) -> LoadSummary {
        let summary = LoadSummary {
            rows: normalized.ledger.len(),
            coerced_values: normalized.coerced_values,
        };
        self.state.load(normalized.ledger);
        summary
    }

    /// Read and normalize `path`, replacing any previously loaded ledger.
    pub fn load(&mut self, path: &Path) -> Result<LoadSummary> {
        let normalized = load_ledger(path, &self.columns)?;
        let summary = self.install(normalized);
        info!(path = %path.display(), rows = summary.rows, "loaded statement");
        Ok(summary)
    }

    /// Same as [`Tracker::load`] for a table that was read elsewhere.
    pub fn load_table(&mut self, table: &RawTable) -> Result<LoadSummary> {
        let normalized = Normalizer::new(self.columns.clone()).normalize(table)?;
        Ok(self.install(normalized))
    }

    pub fn monthly_summary(&self) -> Outcome<Vec<GroupSummary>> {
        self.state.monthly_summary()
    }

    pub fn category_summary(&self) -> Outcome<Vec<GroupSummary>> {
        self.state.category_summary()
    }

    pub fn basic_stats(&self) -> Outcome<BasicStats> {
        self.state.basic_stats()
    }

    pub fn cashflow(&self) -> Outcome<CashflowSummary> {
        self.state.cashflow()
    }

    /// Export the loaded ledger; `Ok(Outcome::NoData)` when nothing is loaded.
    pub fn export_report(&mut self, path: &Path) -> Result<Outcome<String>> {
        match self.state.ledger() {
            Outcome::Ready(ledger) => self.reporter.export(ledger, path).map(Outcome::Ready),
            Outcome::NoData => Ok(Outcome::NoData),
        }
    }
}
