//! Writing the page, the JSON summary and standalone chart files

use crate::html::render_html;
use crate::view::{DashboardView, RenderedChart};
use bikeshare_common::{DashboardError, DateRange, Result};
use bikeshare_config::{ChartFormat, Config};
use bikeshare_graphs::{ChartRenderer, PlottersRenderer, UsageSummary};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// File name of the page
pub const PAGE_FILE: &str = "index.html";

/// File name of the JSON summary
pub const SUMMARY_FILE: &str = "summary.json";

/// Contents of `summary.json`
#[derive(Debug, Serialize)]
struct SummaryDocument<'a> {
    language: &'a str,
    requested: DateRange,
    resolved: Option<DateRange>,
    empty: bool,
    summary: Option<&'a UsageSummary>,
}

/// Files written for one view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputReport {
    /// Every file written, page first
    pub files: Vec<PathBuf>,
    /// Charts that could not be written
    pub failed_charts: usize,
}

impl OutputReport {
    /// Path of the page
    pub fn page(&self) -> Option<&Path> {
        self.files.first().map(PathBuf::as_path)
    }
}

/// Writes a [`DashboardView`] into the output directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    write_summary_json: bool,
    write_chart_files: bool,
    chart_format: ChartFormat,
    renderer: PlottersRenderer,
}

impl OutputWriter {
    /// Create a writer from the dashboard section of the configuration
    pub fn from_config(config: &Config, renderer: PlottersRenderer) -> Self {
        let dashboard = &config.dashboard;
        Self {
            dir: dashboard.output_dir.clone(),
            write_summary_json: dashboard.write_summary_json,
            write_chart_files: dashboard.write_chart_files,
            chart_format: dashboard.chart_format,
            renderer,
        }
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every enabled output for `view`
    #[instrument(skip(self, view), fields(dir = %self.dir.display()))]
    pub async fn write(&self, view: &DashboardView) -> Result<OutputReport> {
        fs::create_dir_all(&self.dir).await?;
        let mut report = OutputReport::default();

        let page_path = self.dir.join(PAGE_FILE);
        fs::write(&page_path, render_html(view)?).await?;
        report.files.push(page_path);

        if self.write_summary_json {
            let summary_path = self.dir.join(SUMMARY_FILE);
            fs::write(&summary_path, summary_json(view)?).await?;
            report.files.push(summary_path);
        }

        if self.write_chart_files {
            if let DashboardView::Ready(page) = view {
                for chart in page.charts() {
                    match self.write_chart(chart).await {
                        Ok(path) => report.files.push(path),
                        Err(err) => {
                            warn!(chart = %chart.spec.id, error = %err, "Failed to write chart file");
                            report.failed_charts += 1;
                        }
                    }
                }
            }
        }

        info!(files = report.files.len(), "Wrote dashboard output");
        Ok(report)
    }

    async fn write_chart(&self, chart: &RenderedChart) -> Result<PathBuf> {
        let path = self
            .dir
            .join(format!("{}.{}", chart.spec.id, self.chart_format.extension()));

        match (self.chart_format, &chart.svg) {
            (ChartFormat::Svg, Some(svg)) => fs::write(&path, svg).await?,
            (ChartFormat::Svg, None) => {
                return Err(DashboardError::graph(format!(
                    "chart {} has no rendered image",
                    chart.spec.id
                )))
            }
            (ChartFormat::Png, _) => {
                let renderer = self.renderer.clone();
                let spec = chart.spec.clone();
                let target = path.clone();
                tokio::task::spawn_blocking(move || renderer.render_to_file(&spec, &target))
                    .await
                    .map_err(|e| DashboardError::with_source("Chart rendering task failed", e))??;
            }
        }

        debug!(path = %path.display(), "Wrote chart file");
        Ok(path)
    }
}

/// Serialize the JSON summary of a view
pub fn summary_json(view: &DashboardView) -> Result<String> {
    let document = match view {
        DashboardView::Ready(page) => SummaryDocument {
            language: page.header.locale.code(),
            requested: page.requested,
            resolved: Some(page.summary.range),
            empty: false,
            summary: Some(page.summary.as_ref()),
        },
        DashboardView::Empty(empty) => SummaryDocument {
            language: empty.header.locale.code(),
            requested: empty.requested,
            resolved: empty.resolved,
            empty: true,
            summary: None,
        },
    };
    Ok(serde_json::to_string_pretty(&document)?)
}
