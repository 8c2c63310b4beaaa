//! Chart rendering: `ChartSpec` -> PNG bytes.

use std::fmt;
use std::io::Cursor;

use plotters::coord::Shift;
use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::chart::{ChartSpec, LineChart, PieChart, Placeholder};
use crate::error::{ReportError, Result};

/// First eight bytes of every PNG stream.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Encoded PNG image held in memory until it is embedded in a workbook.
#[derive(Clone, PartialEq, Eq)]
pub struct PngImage(Vec<u8>);

impl PngImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        PngImage(bytes)
    }

    /// Starts with the PNG signature. Renderers are free to return anything,
    /// so writers check this before decoding.
    pub fn has_png_signature(&self) -> bool {
        self.0.starts_with(&PNG_SIGNATURE)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PngImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PngImage({} bytes)", self.0.len())
    }
}

/// Turns a chart spec into a raster image.
pub trait ChartRenderer {
    fn render(&mut self, spec: &ChartSpec) -> Result<PngImage>;
}

/// Matplotlib "tab10" colors, cycled for pie slices.
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn backend_err<E: fmt::Display>(e: E) -> ReportError {
    ReportError::Render(e.to_string())
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Y range covering `values` with some headroom; never empty.
fn padded_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    let pad = ((max - min) * 0.1).max(1.0);
    (min - pad, max + pad)
}

fn encode_png(pixels: Vec<u8>, width: u32, height: u32) -> Result<PngImage> {
    let img = image::RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| ReportError::Render("bitmap buffer does not match chart size".to_string()))?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)?;
    Ok(PngImage::new(out.into_inner()))
}

/// Draws charts with `plotters` on an in-memory bitmap and encodes them as PNG.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    font: &'static str,
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self { font: "sans-serif" }
    }
}

impl PlottersRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn draw_line(&self, root: &Area<'_>, chart: &LineChart) -> Result<()> {
        let labels: Vec<&str> = chart.points.iter().map(|(k, _)| k.as_str()).collect();
        let values: Vec<f64> = chart.points.iter().map(|(_, v)| to_f64(*v)).collect();
        let (y_min, y_max) = padded_range(&values);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, (self.font, 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d((0..labels.len().max(1)).into_segmented(), y_min..y_max)
            .map_err(backend_err)?;

        let x_label = |x: &SegmentValue<usize>| match x {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i).map(|s| s.to_string()).unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        };
        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(labels.len().max(1))
            .x_label_formatter(&x_label)
            .label_style((self.font, 14))
            .draw()
            .map_err(backend_err)?;

        let points = || values.iter().enumerate().map(|(i, v)| (SegmentValue::CenterOf(i), *v));
        ctx.draw_series(LineSeries::new(points(), BLUE.stroke_width(2)))
            .map_err(backend_err)?;
        ctx.draw_series(points().map(|p| Circle::new(p, 4, BLUE.filled())))
            .map_err(backend_err)?;
        Ok(())
    }

    fn draw_pie(&self, root: &Area<'_>, chart: &PieChart) -> Result<()> {
        let area = root.titled(&chart.title, (self.font, 28)).map_err(backend_err)?;
        let (w, h) = area.dim_in_pixel();
        let center = ((w / 2) as i32, (h / 2) as i32);
        let radius = f64::from(w.min(h)) * 0.35;

        let sizes: Vec<f64> = chart.slices.iter().map(|(_, v)| to_f64(*v)).collect();
        let labels: Vec<&str> = chart.slices.iter().map(|(k, _)| k.as_str()).collect();
        let colors: Vec<RGBColor> = (0..sizes.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(90.0);
        pie.label_style((self.font, 18).into_font().color(&BLACK));
        pie.percentages((self.font, 16).into_font().color(&WHITE));
        area.draw(&pie).map_err(backend_err)?;
        Ok(())
    }

    fn draw_placeholder(&self, root: &Area<'_>, placeholder: &Placeholder) -> Result<()> {
        let area = root
            .titled(&placeholder.title, (self.font, 28))
            .map_err(backend_err)?;
        let (w, h) = area.dim_in_pixel();
        let style = TextStyle::from((self.font, 22).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
        area.draw(&Text::new(
            placeholder.message.as_str(),
            ((w / 2) as i32, (h / 2) as i32),
            style,
        ))
        .map_err(backend_err)?;
        Ok(())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&mut self, spec: &ChartSpec) -> Result<PngImage> {
        let (width, height) = spec.size();
        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(backend_err)?;
            match spec {
                ChartSpec::Line(chart) => self.draw_line(&root, chart)?,
                ChartSpec::Pie(chart) => self.draw_pie(&root, chart)?,
                ChartSpec::Placeholder(placeholder) => self.draw_placeholder(&root, placeholder)?,
            }
            root.present().map_err(backend_err)?;
        }
        let png = encode_png(pixels, width, height)?;
        tracing::debug!(chart = spec.title(), width, height, bytes = png.len(), "rendered chart");
        Ok(png)
    }
}
