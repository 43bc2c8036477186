//! Chart rendering with plotters
//!
//! [`PlottersRenderer`] draws a [`ChartSpec`] on any plotters backend: an
//! in-memory SVG string for the page, or an SVG/PNG file on disk.

use crate::types::{
    ChartKind, ChartSpec, ChartStyle, PointSeries, Rgb, Series, SeriesRole, Slice,
};
use crate::regression::LinearFit;
use bikeshare_common::{format_thousands, DashboardError, Result};
use chrono::NaiveDate;
use plotters::coord::ranged1d::ValueFormatter;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;
use tracing::{debug, info, instrument};

const MARGIN: u32 = 15;
const X_LABEL_AREA: u32 = 50;
const Y_LABEL_AREA: u32 = 80;
const LABEL_FONT_SIZE: u32 = 14;
const MARKER_SIZE: u32 = 3;
const BAND_SAMPLES: usize = 50;

/// Trait for rendering chart specifications
pub trait ChartRenderer {
    /// Render a chart to an SVG document
    fn render_svg(&self, spec: &ChartSpec) -> Result<String>;

    /// Render a chart to a file; the extension (`svg` or `png`) picks the format
    fn render_to_file(&self, spec: &ChartSpec, path: &Path) -> Result<()>;
}

/// Renderer backed by plotters' SVG and bitmap backends
#[derive(Debug, Clone, Default)]
pub struct PlottersRenderer {
    style: ChartStyle,
}

impl PlottersRenderer {
    /// Create a renderer with the given style
    pub const fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    /// Style used for every chart
    pub const fn style(&self) -> &ChartStyle {
        &self.style
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.style.width, self.style.height)
    }
}

impl ChartRenderer for PlottersRenderer {
    #[instrument(skip(self, spec), fields(chart = %spec.id))]
    fn render_svg(&self, spec: &ChartSpec) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.dimensions()).into_drawing_area();
            draw_chart(&root, spec, &self.style)?;
        }
        debug!(bytes = svg.len(), "Rendered chart to SVG");
        Ok(svg)
    }

    #[instrument(skip(self, spec), fields(chart = %spec.id, path = %path.display()))]
    fn render_to_file(&self, spec: &ChartSpec, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("png") => {
                let root = BitMapBackend::new(path, self.dimensions()).into_drawing_area();
                draw_chart(&root, spec, &self.style)?;
            }
            Some("svg") => {
                let root = SVGBackend::new(path, self.dimensions()).into_drawing_area();
                draw_chart(&root, spec, &self.style)?;
            }
            _ => {
                return Err(DashboardError::graph(format!(
                    "unsupported chart file type: {}",
                    path.display()
                )))
            }
        }
        info!("Successfully rendered chart to {}", path.display());
        Ok(())
    }
}

const fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn format_axis_count(value: &f64) -> String {
    let rounded = value.round();
    let magnitude = format_thousands(rounded.abs() as u64);
    if rounded < 0.0 {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

/// Upper bound of a value axis with some headroom, never zero
fn padded_max(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0_f64, f64::max).max(1.0) * 1.1
}

/// Draw `spec` onto `root` and present it
pub fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, spec: &ChartSpec, style: &ChartStyle) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&rgb(style.background))?;

    match &spec.kind {
        ChartKind::Pie { slices } => draw_pie(root, spec, style, slices)?,
        ChartKind::Line { dates, series } => draw_line(root, spec, style, dates, series)?,
        ChartKind::Scatter { series } => draw_scatter(root, spec, style, series)?,
        ChartKind::Regression {
            points,
            fit,
            point_role,
            series_name,
            fit_name,
        } => draw_regression(
            root,
            spec,
            style,
            points,
            fit.as_ref(),
            *point_role,
            series_name,
            fit_name,
        )?,
        ChartKind::GroupedBar { categories, series } => {
            draw_grouped_bars(root, spec, style, categories, series)?;
        }
    }

    root.present()?;
    Ok(())
}

fn chart_builder<'a, 'b, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    style: &'b ChartStyle,
) -> ChartBuilder<'a, 'b, DB> {
    let mut builder = ChartBuilder::on(root);
    builder
        .caption(
            &spec.title,
            (style.font_family.as_str(), style.title_font_size),
        )
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA);
    builder
}

fn draw_mesh<'a, DB, X, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<X, Y>>,
    spec: &ChartSpec,
    style: &ChartStyle,
    x_formatter: Option<&dyn Fn(&X::ValueType) -> String>,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    X: Ranged + ValueFormatter<X::ValueType>,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .label_style((style.font_family.as_str(), LABEL_FONT_SIZE))
        .y_label_formatter(&format_axis_count);
    if let Some(formatter) = x_formatter {
        mesh.x_label_formatter(formatter);
    }
    if !style.enable_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;
    Ok(())
}

fn draw_legend<'a, DB, X, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<X, Y>>,
    style: &ChartStyle,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    X: Ranged,
    Y: Ranged,
{
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font((style.font_family.as_str(), LABEL_FONT_SIZE))
        .draw()?;
    Ok(())
}

/// Caption plus a few lines of text, for charts with nothing to plot
fn draw_message<DB>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    style: &ChartStyle,
    lines: &[String],
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = root.titled(
        &spec.title,
        (style.font_family.as_str(), style.title_font_size),
    )?;
    let (width, height) = area.dim_in_pixel();
    let line_height = i32::try_from(LABEL_FONT_SIZE * 2).unwrap_or(28);
    let x = i32::try_from(width / 3).unwrap_or(0);
    let mut y = i32::try_from(height / 2).unwrap_or(0);
    for line in lines {
        area.draw(&Text::new(
            line.clone(),
            (x, y),
            (style.font_family.as_str(), LABEL_FONT_SIZE * 3 / 2).into_font(),
        ))?;
        y += line_height;
    }
    Ok(())
}

fn draw_pie<DB>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    style: &ChartStyle,
    slices: &[Slice],
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total <= 0.0 {
        let lines: Vec<String> = slices
            .iter()
            .map(|s| format!("{}: {}", s.label, format_axis_count(&s.value)))
            .collect();
        return draw_message(root, spec, style, &lines);
    }

    let area = root.titled(
        &spec.title,
        (style.font_family.as_str(), style.title_font_size),
    )?;
    let (width, height) = area.dim_in_pixel();
    let center = (
        i32::try_from(width / 2).unwrap_or(0),
        i32::try_from(height / 2).unwrap_or(0),
    );
    let radius = f64::from(width.min(height)) * 0.38;
    let sizes: Vec<f64> = slices.iter().map(|s| s.value).collect();
    let colors: Vec<RGBColor> = slices
        .iter()
        .map(|s| rgb(style.role_color(s.role)))
        .collect();
    let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(
        (style.font_family.as_str(), LABEL_FONT_SIZE + 2)
            .into_font()
            .color(&BLACK),
    );
    pie.percentages(
        (style.font_family.as_str(), LABEL_FONT_SIZE + 2)
            .into_font()
            .color(&WHITE),
    );
    area.draw(&pie)?;
    Ok(())
}

fn draw_line<DB>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    style: &ChartStyle,
    dates: &[NaiveDate],
    series: &[Series],
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (Some(&first), Some(&last)) = (dates.first(), dates.last()) else {
        return draw_message(root, spec, style, &[]);
    };
    // A one-day selection still needs a non-empty axis.
    let end = if first == last {
        last.succ_opt().unwrap_or(last)
    } else {
        last
    };
    let y_max = padded_max(series.iter().flat_map(|s| s.values.iter().copied()));

    let mut chart = chart_builder(root, spec, style).build_cartesian_2d(first..end, 0f64..y_max)?;
    let date_label: &dyn Fn(&NaiveDate) -> String = &|date| date.format("%Y-%m-%d").to_string();
    draw_mesh(&mut chart, spec, style, Some(date_label))?;

    for s in series {
        let color = rgb(style.role_color(s.role));
        let points: Vec<(NaiveDate, f64)> = dates.iter().copied().zip(s.values.iter().copied()).collect();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(s.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart.draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, MARKER_SIZE, color.filled())),
        )?;
    }

    draw_legend(&mut chart, style)
}

fn draw_scatter<DB>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    style: &ChartStyle,
    series: &[PointSeries],
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let y_max = padded_max(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));
    let mut chart = chart_builder(root, spec, style).build_cartesian_2d(0f64..1f64, 0f64..y_max)?;
    draw_mesh(&mut chart, spec, style, None)?;

    for s in series {
        let color = rgb(style.role_color(s.role));
        chart
            .draw_series(
                s.points
                    .iter()
                    .map(|&point| Circle::new(point, MARKER_SIZE + 1, color.mix(0.6).filled())),
            )?
            .label(s.name.as_str())
            .legend(move |(x, y)| Circle::new((x + 10, y), MARKER_SIZE + 1, color.filled()));
    }

    draw_legend(&mut chart, style)
}

#[allow(clippy::too_many_arguments)]
fn draw_regression<DB>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    style: &ChartStyle,
    points: &[(f64, f64)],
    fit: Option<&LinearFit>,
    point_role: SeriesRole,
    series_name: &str,
    fit_name: &str,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);

    let band: Vec<(f64, f64, f64)> = match fit {
        Some(fit) if x_min < x_max => (0..=BAND_SAMPLES)
            .map(|i| {
                let x = (x_max - x_min).mul_add(i as f64 / BAND_SAMPLES as f64, x_min);
                let (low, high) = fit.band(x);
                (x, low, high)
            })
            .collect(),
        _ => Vec::new(),
    };

    let y_max = padded_max(
        points
            .iter()
            .map(|p| p.1)
            .chain(band.iter().map(|b| b.2)),
    );
    let y_min = band.iter().map(|b| b.1).fold(0.0_f64, f64::min) * 1.1;

    let mut chart = chart_builder(root, spec, style).build_cartesian_2d(0f64..1f64, y_min..y_max)?;
    draw_mesh(&mut chart, spec, style, None)?;

    let point_color = rgb(style.role_color(point_role));
    chart
        .draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, MARKER_SIZE + 1, point_color.mix(0.6).filled())),
        )?
        .label(series_name)
        .legend(move |(x, y)| Circle::new((x + 10, y), MARKER_SIZE + 1, point_color.filled()));

    if !band.is_empty() {
        let line_color = rgb(style.regression_line);
        let outline: Vec<(f64, f64)> = band
            .iter()
            .map(|&(x, _, high)| (x, high))
            .chain(band.iter().rev().map(|&(x, low, _)| (x, low)))
            .collect();
        chart.draw_series(std::iter::once(Polygon::new(
            outline,
            line_color.mix(0.2).filled(),
        )))?;
        chart
            .draw_series(LineSeries::new(
                band.iter().map(|&(x, low, high)| (x, (low + high) / 2.0)),
                line_color.stroke_width(2),
            ))?
            .label(fit_name)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], line_color.stroke_width(2))
            });
    }

    draw_legend(&mut chart, style)
}

fn draw_grouped_bars<DB>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    style: &ChartStyle,
    categories: &[String],
    series: &[Series],
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if categories.is_empty() || series.is_empty() {
        return draw_message(root, spec, style, &[]);
    }

    let y_max = padded_max(series.iter().flat_map(|s| s.values.iter().copied()));
    let x_range = -0.5..(categories.len() as f64 - 0.5);
    let mut chart = chart_builder(root, spec, style).build_cartesian_2d(x_range, 0f64..y_max)?;

    let category_label = |x: &f64| {
        let index = x.round();
        if (x - index).abs() > 1e-6 || index < 0.0 {
            return String::new();
        }
        categories
            .get(index as usize)
            .cloned()
            .unwrap_or_default()
    };
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .label_style((style.font_family.as_str(), LABEL_FONT_SIZE))
        .x_labels(categories.len() + 1)
        .x_label_formatter(&category_label)
        .y_label_formatter(&format_axis_count)
        .disable_x_mesh();
    if !style.enable_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    let group_width = 0.8;
    let bar_width = group_width / series.len() as f64;
    for (j, s) in series.iter().enumerate() {
        let color = rgb(style.role_color(s.role));
        let offset = (j as f64).mul_add(bar_width, -group_width / 2.0);
        chart
            .draw_series(s.values.iter().enumerate().map(|(i, &value)| {
                let left = i as f64 + offset;
                Rectangle::new([(left, 0.0), (left + bar_width, value)], color.filled())
            }))?
            .label(s.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    draw_legend(&mut chart, style)
}
