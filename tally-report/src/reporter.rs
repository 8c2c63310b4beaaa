//! Report export: aggregates + charts -> multi-sheet workbook.

use std::path::Path;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tally_core::{CashflowSummary, GroupSummary, Ledger};
use tracing::info;

use crate::chart::{self, ChartSpec};
use crate::error::Result;
use crate::render::{ChartRenderer, PlottersRenderer};
use crate::workbook::{CellValue, ImageSheet, PlacedImage, Table, WorkbookPlan, WorkbookWriter};
use crate::xlsx::XlsxWriter;

/// Categories shown in each pie chart.
pub const DEFAULT_TOP_N: usize = 5;

pub const TRANSACTIONS_SHEET: &str = "Transactions";
pub const MONTHLY_SHEET: &str = "Monthly Summary";
pub const CATEGORY_SHEET: &str = "Category Summary";
pub const SUMMARY_SHEET: &str = "Summary";
pub const CHARTS_SHEET: &str = "Charts";

/// Where one chart lands on the Charts sheet (zero-based cell anchor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub row: u32,
    pub col: u16,
    pub x_scale: f64,
    pub y_scale: f64,
    /// Optional `[row, points]` height override applied with this chart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sized_row: Option<(u32, f64)>,
}

impl Placement {
    fn place(&self, image: crate::render::PngImage) -> PlacedImage {
        PlacedImage {
            image,
            row: self.row,
            col: self.col,
            x_scale: self.x_scale,
            y_scale: self.y_scale,
        }
    }
}

/// Anchors and scale factors of the three charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    pub monthly: Placement,
    pub expense: Placement,
    pub income: Placement,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            // A1
            monthly: Placement {
                row: 0,
                col: 0,
                x_scale: 0.9,
                y_scale: 0.9,
                sized_row: Some((0, 300.0)),
            },
            // A20; the enlarged row sits just below the anchor.
            expense: Placement {
                row: 19,
                col: 0,
                x_scale: 0.8,
                y_scale: 0.8,
                sized_row: Some((20, 300.0)),
            },
            // J20
            income: Placement {
                row: 19,
                col: 9,
                x_scale: 0.8,
                y_scale: 0.8,
                sized_row: None,
            },
        }
    }
}

fn transactions_table(ledger: &Ledger) -> Table {
    let mut headers: Vec<String> = ["Posting Date", "Value Date", "Debit", "Credit", "Description", "Category", "Tag"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    headers.extend(ledger.extra_columns().iter().cloned());
    headers.extend(["Amount", "Month", "Year", "Period"].map(String::from));

    let mut table = Table::new(headers);
    for txn in ledger {
        let mut row: Vec<CellValue> = vec![
            txn.posting_date().into(),
            txn.value_date.into(),
            txn.debit().into(),
            txn.credit().into(),
            txn.description.as_str().into(),
            txn.category.as_str().into(),
            txn.tag.as_str().into(),
        ];
        row.extend(txn.extra.iter().map(|v| CellValue::from(v.as_str())));
        let posted = txn.posting_date();
        row.push(txn.amount().into());
        row.push(CellValue::Integer(u64::from(posted.month())));
        row.push(u64::try_from(posted.year()).map_or(CellValue::Empty, CellValue::Integer));
        row.push(txn.period_key().as_str().into());
        table.push(row);
    }
    table
}

fn group_table(key_header: &str, groups: &[GroupSummary]) -> Table {
    let mut table = Table::new([key_header, "Amount", "Transactions"]);
    for g in groups {
        table.push(vec![
            g.key.as_str().into(),
            g.total_amount.into(),
            g.transaction_count.into(),
        ]);
    }
    table
}

fn summary_table(cashflow: &CashflowSummary) -> Table {
    let mut table = Table::new(["Metric", "Amount"]);
    for (metric, amount) in cashflow.rows() {
        table.push(vec![metric.into(), amount.into()]);
    }
    table
}

/// Builds and writes the report workbook through pluggable collaborators.
#[derive(Debug)]
pub struct Reporter<R = PlottersRenderer, W = XlsxWriter> {
    renderer: R,
    writer: W,
    layout: ChartLayout,
    top_n: usize,
}

impl Default for Reporter {
    fn default() -> Self {
        Reporter::new(PlottersRenderer::default(), XlsxWriter::default())
    }
}

impl<R: ChartRenderer, W: WorkbookWriter> Reporter<R, W> {
    pub fn new(renderer: R, writer: W) -> Self {
        Self {
            renderer,
            writer,
            layout: ChartLayout::default(),
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_layout(mut self, layout: ChartLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn charts_sheet(&mut self, ledger: &Ledger, monthly: &[GroupSummary]) -> Result<ImageSheet> {
        let specs: [(ChartSpec, Placement); 3] = [
            (chart::monthly_trend(monthly), self.layout.monthly),
            (chart::expense_breakdown(ledger, self.top_n), self.layout.expense),
            (chart::income_breakdown(ledger, self.top_n), self.layout.income),
        ];

        let mut sheet = ImageSheet::default();
        for (spec, placement) in specs {
            let image = self.renderer.render(&spec)?;
            if let Some(sized) = placement.sized_row {
                sheet.row_heights.push(sized);
            }
            sheet.images.push(placement.place(image));
        }
        Ok(sheet)
    }

    /// Assemble every sheet, rendering the charts along the way.
    pub fn build_plan(&mut self, ledger: &Ledger) -> Result<WorkbookPlan> {
        let monthly = ledger.monthly_summary();

        let mut plan = WorkbookPlan::new();
        plan.add_table(TRANSACTIONS_SHEET, transactions_table(ledger));
        plan.add_table(MONTHLY_SHEET, group_table("Period", &monthly));
        plan.add_table(CATEGORY_SHEET, group_table("Category", &ledger.category_summary()));
        plan.add_table(SUMMARY_SHEET, summary_table(&ledger.cashflow()));
        let charts = self.charts_sheet(ledger, &monthly)?;
        plan.add_images(CHARTS_SHEET, charts);
        Ok(plan)
    }

    /// Write the report to `path` and return the confirmation message.
    pub fn export(&mut self, ledger: &Ledger, path: &Path) -> Result<String> {
        let plan = self.build_plan(ledger)?;
        // The plan (and every image buffer in it) is consumed here.
        self.writer.write(plan, path)?;
        info!(path = %path.display(), rows = ledger.len(), "exported report");
        Ok(format!("Report with charts exported to {}", path.display()))
    }
}
