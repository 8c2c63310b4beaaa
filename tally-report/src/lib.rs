//! tally-report: charts, workbook assembly and the tracker session facade.

pub mod chart;
pub mod error;
pub mod render;
pub mod reporter;
pub mod tracker;
pub mod workbook;
pub mod xlsx;

pub use chart::{ChartSpec, LineChart, PieChart, Placeholder};
pub use error::{ReportError, Result};
pub use render::{ChartRenderer, PlottersRenderer, PngImage};
pub use reporter::{ChartLayout, Placement, Reporter};
pub use tracker::{LoadSummary, Tracker};
pub use workbook::{CellValue, ImageSheet, PlacedImage, Sheet, SheetContent, Table, WorkbookPlan, WorkbookWriter};
pub use xlsx::XlsxWriter;
