//! The date-range event handler tying loading, filtering, aggregation and
//! rendering together.

use crate::view::{
    DashboardPage, DashboardView, EmptyState, Metric, PageHeader, PageSection, RenderedChart,
};
use bikeshare_common::{
    format_percentage, format_signed_thousands, format_thousands, DashboardError, DateRange,
    Result, WeatherSituation,
};
use bikeshare_config::Config;
use bikeshare_graphs::{
    CacheStats, CachedAggregationManager, ChartCatalog, ChartId, ChartRenderer, ChartSpec,
    ChartStyle, Dataset, DatasetLoader, DateFilter, PlottersRenderer, UsageSummary,
};
use bikeshare_i18n::{fluent_args, FluentArgs, I18nManager, Locale};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Charts of each page section, in display order
const SECTION_CHARTS: [(&str, &[ChartId]); 5] = [
    ("section-total-users", &[ChartId::UsageShare]),
    ("section-daily-users", &[ChartId::DailyUsers]),
    (
        "section-temperature",
        &[
            ChartId::TemperatureScatter,
            ChartId::TotalVsTemp,
            ChartId::TotalVsAtemp,
        ],
    ),
    ("section-season", &[ChartId::SeasonBars]),
    ("section-weather", &[ChartId::WeatherBars]),
];

/// Owns the dataset and produces a [`DashboardView`] per date-range event.
///
/// Charts are drawn by `R`, the plotters renderer unless replaced with
/// [`Dashboard::with_renderer`].
pub struct Dashboard<R = PlottersRenderer> {
    dataset: Arc<Dataset>,
    filter: DateFilter,
    aggregator: CachedAggregationManager,
    i18n: Arc<I18nManager>,
    locale: Locale,
    renderer: R,
    initial_range: Option<DateRange>,
}

impl<R> std::fmt::Debug for Dashboard<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("records", &self.dataset.len())
            .field("bounds", &self.dataset.bounds())
            .field("policy", &self.filter.policy())
            .field("locale", &self.locale)
            .field("cache", &self.aggregator)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Load the configured dataset and translations and build a dashboard.
    ///
    /// Translations found under `dashboard.locales_dir` replace the bundled
    /// ones per locale.
    ///
    /// A dataset that cannot be loaded is a fatal [`DashboardError::Load`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let dataset = DatasetLoader::new().load_path(&config.data.dataset_path)?;
        let i18n = match &config.dashboard.locales_dir {
            Some(dir) => I18nManager::with_locales_dir(Locale::default(), dir)?,
            None => I18nManager::new(Locale::default())?,
        };
        Self::new(Arc::new(dataset), config, Arc::new(i18n))
    }

    /// Build a dashboard over an already loaded dataset
    pub fn new(dataset: Arc<Dataset>, config: &Config, i18n: Arc<I18nManager>) -> Result<Self> {
        let locale = Locale::from_code(&config.dashboard.language).ok_or_else(|| {
            DashboardError::validation_field(
                format!("unsupported language '{}'", config.dashboard.language),
                "dashboard.language",
            )
        })?;
        let initial_range = config
            .data
            .initial_range
            .map(|initial| DateRange::new(initial.start, initial.end))
            .transpose()?;

        info!(
            records = dataset.len(),
            bounds = %dataset.bounds(),
            locale = %locale,
            "Dashboard ready"
        );

        Ok(Self {
            filter: DateFilter::new(dataset.bounds(), config.data.range_policy),
            aggregator: CachedAggregationManager::new(&config.cache),
            renderer: PlottersRenderer::new(ChartStyle::from_config(&config.graphs)?),
            dataset,
            i18n,
            locale,
            initial_range,
        })
    }

    /// Replace the chart renderer
    pub fn with_renderer<S: ChartRenderer>(self, renderer: S) -> Dashboard<S> {
        Dashboard {
            dataset: self.dataset,
            filter: self.filter,
            aggregator: self.aggregator,
            i18n: self.i18n,
            locale: self.locale,
            renderer,
            initial_range: self.initial_range,
        }
    }
}

impl<R: ChartRenderer> Dashboard<R> {
    /// The loaded dataset
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Page language
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Renderer used for the page, shared with the output writer
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Every date in the dataset
    pub fn full_range(&self) -> DateRange {
        self.dataset.bounds()
    }

    /// Range shown at startup: the configured one, else the full dataset
    pub fn initial_range(&self) -> DateRange {
        self.initial_range.unwrap_or_else(|| self.full_range())
    }

    /// Summary cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.aggregator.stats()
    }

    /// Handle a new date-range selection.
    ///
    /// Returns [`DashboardView::Empty`] when no record falls in the range,
    /// and [`DashboardError::InvalidRange`] when the range policy rejects it.
    #[instrument(skip(self), fields(%requested))]
    pub fn on_date_range_changed(&self, requested: DateRange) -> Result<DashboardView> {
        let Some(resolved) = self.filter.resolve(requested)? else {
            info!("Requested range lies outside the dataset");
            return Ok(DashboardView::Empty(self.empty_state(requested, None)));
        };

        let summary = self.aggregator.summarize(resolved, || {
            self.filter.filter_records(self.dataset.records(), resolved)
        });

        if summary.is_empty() {
            info!(%resolved, "No records in range");
            return Ok(DashboardView::Empty(
                self.empty_state(requested, Some(resolved)),
            ));
        }

        let page = self.build_page(requested, summary);
        let failed = page.charts().filter(|chart| chart.is_failed()).count();
        info!(
            records = page.summary.record_count,
            failed_charts = failed,
            "Rendered dashboard view"
        );
        Ok(DashboardView::Ready(Box::new(page)))
    }

    fn text(&self, key: &str) -> String {
        self.i18n.text(key, self.locale)
    }

    fn message(&self, key: &str, args: Option<FluentArgs<'_>>) -> String {
        self.i18n
            .get_message_or_default(key, self.locale, args.as_ref(), key)
    }

    fn header(&self, range: DateRange) -> PageHeader {
        PageHeader {
            locale: self.locale,
            title: self.text("dashboard-title"),
            range_label: self.text("date-range-label"),
            range_text: self.message(
                "date-range-value",
                fluent_args![
                    "start" => range.start().to_string(),
                    "end" => range.end().to_string()
                ],
            ),
        }
    }

    fn empty_state(&self, requested: DateRange, resolved: Option<DateRange>) -> EmptyState {
        EmptyState {
            header: self.header(requested),
            requested,
            resolved,
            heading: self.text("empty-state-title"),
            message: self.message(
                "empty-state",
                fluent_args![
                    "start" => requested.start().to_string(),
                    "end" => requested.end().to_string()
                ],
            ),
        }
    }

    fn render_chart(&self, spec: ChartSpec) -> RenderedChart {
        match self.renderer.render_svg(&spec) {
            Ok(svg) => RenderedChart {
                spec,
                svg: Some(svg),
                error: None,
            },
            Err(err) => {
                warn!(chart = %spec.id, error = %err, "Chart failed to render");
                let error = self.message("chart-error", fluent_args!["error" => err.to_string()]);
                RenderedChart {
                    spec,
                    svg: None,
                    error: Some(error),
                }
            }
        }
    }

    fn growth_metric(&self, summary: &UsageSummary) -> Option<Metric> {
        summary.growth.map(|growth| Metric {
            label: self.text("metric-daily-growth"),
            value: format_thousands(growth.last_total),
            detail: Some(self.message(
                "metric-delta",
                fluent_args![
                    "delta" => format_signed_thousands(growth.delta),
                    "first_date" => growth.first_date.to_string()
                ],
            )),
        })
    }

    fn total_metrics(&self, summary: &UsageSummary) -> Vec<Metric> {
        let totals = summary.totals;
        let share = summary.share;
        vec![
            Metric {
                label: self.text("metric-total-casual"),
                value: format_thousands(totals.casual),
                detail: share.map(|s| format_percentage(s.casual_pct)),
            },
            Metric {
                label: self.text("metric-total-registered"),
                value: format_thousands(totals.registered),
                detail: share.map(|s| format_percentage(s.registered_pct)),
            },
            Metric {
                label: self.text("metric-total-users"),
                value: format_thousands(totals.total),
                detail: None,
            },
        ]
    }

    fn section_notes(&self, heading_key: &str) -> Vec<String> {
        match heading_key {
            "section-temperature" => ["note-temperature", "note-temp-definition", "note-atemp-definition"]
                .iter()
                .map(|key| self.text(key))
                .collect(),
            "section-weather" => std::iter::once(self.text("note-weather"))
                .chain(
                    WeatherSituation::all()
                        .iter()
                        .map(|w| format!("{}: {}", w.code(), self.text(w.message_key()))),
                )
                .collect(),
            _ => Vec::new(),
        }
    }

    fn build_page(&self, requested: DateRange, summary: Arc<UsageSummary>) -> DashboardPage {
        let catalog = ChartCatalog::new(&self.i18n, self.locale);
        let years = summary
            .years
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        let sections = SECTION_CHARTS
            .iter()
            .map(|(heading_key, ids)| PageSection {
                heading: self.text(heading_key),
                metrics: if *heading_key == "section-total-users" {
                    self.total_metrics(&summary)
                } else {
                    Vec::new()
                },
                charts: ids
                    .iter()
                    .map(|id| self.render_chart(catalog.build(*id, &summary)))
                    .collect(),
                notes: self.section_notes(heading_key),
            })
            .collect();

        let clamped_notice = (summary.range != requested).then(|| {
            self.message(
                "range-clamped",
                fluent_args![
                    "start" => summary.range.start().to_string(),
                    "end" => summary.range.end().to_string()
                ],
            )
        });

        DashboardPage {
            header: self.header(summary.range),
            requested,
            clamped_notice,
            years_text: self.message("years-label", fluent_args!["years" => years]),
            growth: self.growth_metric(&summary),
            notes_title: self.text("note-title"),
            sections,
            summary,
        }
    }
}
