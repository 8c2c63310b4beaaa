//! In-memory workbook model handed to a [`WorkbookWriter`].
//!
//! The plan owns every table cell and chart image. Writers take it by value,
//! so image buffers are freed once the file has been written.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::render::PngImage;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(Decimal),
    Integer(u64),
    Date(NaiveDate),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Number(value)
    }
}

impl From<Option<Decimal>> for CellValue {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(CellValue::Empty, CellValue::Number)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        CellValue::Integer(value as u64)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

/// Header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn column(&self, header: &str) -> Option<Vec<&CellValue>> {
        let idx = self.headers.iter().position(|h| h == header)?;
        Some(self.rows.iter().filter_map(|r| r.get(idx)).collect())
    }
}

/// An image anchored at a zero-based cell with independent x/y scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    pub image: PngImage,
    pub row: u32,
    pub col: u16,
    pub x_scale: f64,
    pub y_scale: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSheet {
    pub images: Vec<PlacedImage>,
    /// `(row, height in points)` overrides.
    pub row_heights: Vec<(u32, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetContent {
    Table(Table),
    Images(ImageSheet),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub content: SheetContent,
}

/// Ordered list of sheets to write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookPlan {
    sheets: Vec<Sheet>,
}

impl WorkbookPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, name: impl Into<String>, table: Table) {
        self.sheets.push(Sheet {
            name: name.into(),
            content: SheetContent::Table(table),
        });
    }

    pub fn add_images(&mut self, name: impl Into<String>, images: ImageSheet) {
        self.sheets.push(Sheet {
            name: name.into(),
            content: SheetContent::Images(images),
        });
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        match &self.sheet(name)?.content {
            SheetContent::Table(t) => Some(t),
            SheetContent::Images(_) => None,
        }
    }

    pub fn images(&self, name: &str) -> Option<&ImageSheet> {
        match &self.sheet(name)?.content {
            SheetContent::Images(i) => Some(i),
            SheetContent::Table(_) => None,
        }
    }

    pub fn into_sheets(self) -> Vec<Sheet> {
        self.sheets
    }
}

/// Persists a workbook plan to `path`.
pub trait WorkbookWriter {
    fn write(&mut self, plan: WorkbookPlan, path: &Path) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cell_value_conversions() {
        assert_eq!(CellValue::from("Utenze"), CellValue::Text("Utenze".into()));
        assert_eq!(CellValue::from(Some(dec!(-11.50))), CellValue::Number(dec!(-11.50)));
        assert_eq!(CellValue::from(None::<Decimal>), CellValue::Empty);
        assert_eq!(CellValue::from(3usize), CellValue::Integer(3));
    }

    #[test]
    fn test_plan_keeps_sheet_order() {
        let mut plan = WorkbookPlan::new();
        plan.add_table("Transactions", Table::new(["Amount"]));
        plan.add_table("Summary", Table::new(["Metric", "Amount"]));
        plan.add_images("Charts", ImageSheet::default());

        assert_eq!(plan.sheet_names(), vec!["Transactions", "Summary", "Charts"]);
        assert!(plan.table("Charts").is_none());
        assert!(plan.images("Charts").is_some());
        assert_eq!(plan.table("Summary").unwrap().headers, vec!["Metric", "Amount"]);
    }

    #[test]
    fn test_table_column_lookup() {
        let mut t = Table::new(["Category", "Amount"]);
        t.push(vec!["Utenze".into(), dec!(-11.50).into()]);
        t.push(vec!["Arte e Cultura".into(), dec!(-30).into()]);
        assert_eq!(
            t.column("Amount").unwrap(),
            vec![&CellValue::Number(dec!(-11.50)), &CellValue::Number(dec!(-30))]
        );
        assert!(t.column("Tag").is_none());
    }
}
