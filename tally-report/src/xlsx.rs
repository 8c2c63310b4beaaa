//! `.xlsx` output through `rust_xlsxwriter`.

use std::path::Path;

use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{ExcelDateTime, Format, Image, Workbook, Worksheet, XlsxError};

use crate::error::{ReportError, Result};
use crate::render::PngImage;
use crate::workbook::{CellValue, ImageSheet, SheetContent, Table, WorkbookPlan, WorkbookWriter};

const DATE_FORMAT: &str = "dd/mm/yyyy";

/// Writes each table with a bold header row; image sheets get their images
/// inserted at the planned anchors.
#[derive(Debug, Default)]
pub struct XlsxWriter;

impl XlsxWriter {
    pub fn new() -> Self {
        XlsxWriter
    }
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    date_format: &Format,
) -> std::result::Result<(), XlsxError> {
    match value {
        CellValue::Empty => {}
        CellValue::Text(s) => {
            sheet.write_string(row, col, s)?;
        }
        CellValue::Number(n) => {
            sheet.write_number(row, col, n.to_f64().unwrap_or_default())?;
        }
        CellValue::Integer(i) => {
            sheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Date(d) => {
            let date = ExcelDateTime::from_ymd(d.year() as u16, d.month() as u8, d.day() as u8)?;
            sheet.write_datetime_with_format(row, col, &date, date_format)?;
        }
    }
    Ok(())
}

fn write_table(sheet: &mut Worksheet, table: &Table) -> std::result::Result<(), XlsxError> {
    let header = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    for (col, name) in table.headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name, &header)?;
    }
    for (idx, row) in table.rows.iter().enumerate() {
        let r = idx as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            write_cell(sheet, r, col as u16, value, &date_format)?;
        }
    }
    sheet.autofit();
    Ok(())
}

fn write_images(sheet: &mut Worksheet, images: &ImageSheet) -> std::result::Result<(), XlsxError> {
    for &(row, height) in &images.row_heights {
        sheet.set_row_height(row, height)?;
    }
    for placed in &images.images {
        let image = Image::new_from_buffer(placed.image.as_bytes())?
            .set_scale_width(placed.x_scale)
            .set_scale_height(placed.y_scale);
        sheet.insert_image(placed.row, placed.col, &image)?;
    }
    Ok(())
}

fn decodes_as_png(image: &PngImage) -> bool {
    !image.is_empty()
        && image.has_png_signature()
        && image::load_from_memory_with_format(image.as_bytes(), image::ImageFormat::Png).is_ok()
}

/// `rust_xlsxwriter` parses image headers without bounds checks, so anything
/// that is not a complete PNG is rejected before it gets there.
fn check_images(plan: &WorkbookPlan) -> Result<()> {
    for sheet in plan.sheets() {
        let SheetContent::Images(images) = &sheet.content else {
            continue;
        };
        for (idx, placed) in images.images.iter().enumerate() {
            if !decodes_as_png(&placed.image) {
                return Err(ReportError::InvalidImage {
                    chart: format!("{}#{}", sheet.name, idx + 1),
                    len: placed.image.len(),
                });
            }
        }
    }
    Ok(())
}

impl WorkbookWriter for XlsxWriter {
    fn write(&mut self, plan: WorkbookPlan, path: &Path) -> Result<()> {
        check_images(&plan)?;
        let mut workbook = Workbook::new();
        for sheet in plan.into_sheets() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;
            match &sheet.content {
                SheetContent::Table(table) => write_table(worksheet, table)?,
                SheetContent::Images(images) => write_images(worksheet, images)?,
            }
        }
        workbook.save(path)?;
        tracing::debug!(path = %path.display(), "saved workbook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use calamine::{open_workbook_auto, Data, Reader};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::workbook::PlacedImage;

    fn tiny_png() -> PngImage {
        let mut out = Cursor::new(Vec::new());
        image::RgbImage::new(4, 4)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        PngImage::new(out.into_inner())
    }

    #[test]
    fn test_writes_tables_and_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");

        let mut table = Table::new(["Posting Date", "Category", "Amount", "Transactions"]);
        table.push(vec![
            NaiveDate::from_ymd_opt(2025, 3, 12).unwrap().into(),
            "Ristoranti e bar".into(),
            dec!(-100.00).into(),
            1usize.into(),
        ]);
        let mut plan = WorkbookPlan::new();
        plan.add_table("Transactions", table);
        plan.add_images(
            "Charts",
            ImageSheet {
                images: vec![PlacedImage {
                    image: tiny_png(),
                    row: 0,
                    col: 0,
                    x_scale: 0.9,
                    y_scale: 0.9,
                }],
                row_heights: vec![(0, 300.0)],
            },
        );

        XlsxWriter::new().write(plan, &path).unwrap();

        let mut wb = open_workbook_auto(&path).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Transactions".to_string(), "Charts".to_string()]);
        let range = wb.worksheet_range("Transactions").unwrap();
        assert_eq!(range.get_value((0, 1)), Some(&Data::String("Category".into())));
        assert_eq!(range.get_value((1, 1)), Some(&Data::String("Ristoranti e bar".into())));
        assert_eq!(range.get_value((1, 2)), Some(&Data::Float(-100.0)));
        assert_eq!(range.get_value((1, 3)), Some(&Data::Float(1.0)));
    }

    #[test]
    fn test_invalid_image_bytes_fail() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = WorkbookPlan::new();
        plan.add_images(
            "Charts",
            ImageSheet {
                images: vec![PlacedImage {
                    image: PngImage::new(vec![1, 2, 3]),
                    row: 0,
                    col: 0,
                    x_scale: 1.0,
                    y_scale: 1.0,
                }],
                row_heights: vec![],
            },
        );
        let out = dir.path().join("bad.xlsx");
        let err = XlsxWriter::new().write(plan, &out).unwrap_err();
        assert!(matches!(err, ReportError::InvalidImage { ref chart, len: 3 } if chart == "Charts#1"));
        assert!(!out.exists());
    }

    #[test]
    fn test_truncated_png_fails() {
        let mut truncated = tiny_png().as_bytes().to_vec();
        truncated.truncate(20);
        let placed = |image: PngImage, col: u16| PlacedImage {
            image,
            row: 19,
            col,
            x_scale: 0.8,
            y_scale: 0.8,
        };
        let mut plan = WorkbookPlan::new();
        plan.add_images(
            "Charts",
            ImageSheet {
                images: vec![placed(tiny_png(), 0), placed(PngImage::new(truncated), 9)],
                row_heights: vec![],
            },
        );
        let err = XlsxWriter::new()
            .write(plan, Path::new("unused.xlsx"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Chart \"Charts#2\" is not a PNG image (20 bytes)");
    }

    #[test]
    fn test_empty_image_fails() {
        let mut plan = WorkbookPlan::new();
        plan.add_images(
            "Charts",
            ImageSheet {
                images: vec![PlacedImage {
                    image: PngImage::new(Vec::new()),
                    row: 0,
                    col: 0,
                    x_scale: 1.0,
                    y_scale: 1.0,
                }],
                row_heights: vec![],
            },
        );
        let err = XlsxWriter::new()
            .write(plan, Path::new("unused.xlsx"))
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidImage { len: 0, .. }));
    }

    #[test]
    fn test_unwritable_path_fails() {
        let mut plan = WorkbookPlan::new();
        plan.add_table("Summary", Table::new(["Metric", "Amount"]));
        let err = XlsxWriter::new()
            .write(plan, Path::new("/definitely/not/here/report.xlsx"))
            .unwrap_err();
        assert!(matches!(err, ReportError::Workbook(_)));
    }
}
