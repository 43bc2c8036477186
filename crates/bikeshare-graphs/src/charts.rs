//! Shaping a [`UsageSummary`] into localized chart specifications

use crate::aggregator::{AggregateRow, UsageSummary};
use crate::types::{ChartId, ChartKind, ChartSpec, PointSeries, Series, SeriesRole, Slice};
use bikeshare_i18n::{I18nManager, Locale};

/// Builds every dashboard chart for one locale
#[derive(Debug, Clone, Copy)]
pub struct ChartCatalog<'a> {
    i18n: &'a I18nManager,
    locale: Locale,
}

impl<'a> ChartCatalog<'a> {
    /// Create a catalog localized to `locale`
    pub const fn new(i18n: &'a I18nManager, locale: Locale) -> Self {
        Self { i18n, locale }
    }

    fn text(&self, key: &str) -> String {
        self.i18n.text(key, self.locale)
    }

    fn spec(&self, id: ChartId, title: &str, x_label: &str, y_label: &str, kind: ChartKind) -> ChartSpec {
        ChartSpec {
            id,
            title: self.text(title),
            x_label: self.text(x_label),
            y_label: self.text(y_label),
            kind,
        }
    }

    fn rider_series<K>(&self, rows: &[AggregateRow<K>]) -> Vec<Series> {
        vec![
            Series {
                name: self.text("series-casual"),
                role: SeriesRole::Casual,
                values: rows.iter().map(|r| r.casual as f64).collect(),
            },
            Series {
                name: self.text("series-registered"),
                role: SeriesRole::Registered,
                values: rows.iter().map(|r| r.registered as f64).collect(),
            },
        ]
    }

    /// Every chart of the dashboard, in page order
    pub fn build_all(&self, summary: &UsageSummary) -> Vec<ChartSpec> {
        ChartId::all()
            .into_iter()
            .map(|id| self.build(id, summary))
            .collect()
    }

    /// One chart of the dashboard
    pub fn build(&self, id: ChartId, summary: &UsageSummary) -> ChartSpec {
        match id {
            ChartId::UsageShare => self.usage_share(summary),
            ChartId::DailyUsers => self.daily_users(summary),
            ChartId::TemperatureScatter => self.temperature_scatter(summary),
            ChartId::TotalVsTemp | ChartId::TotalVsAtemp => self.total_vs_temperature(id, summary),
            ChartId::SeasonBars => self.season_bars(summary),
            ChartId::WeatherBars => self.weather_bars(summary),
        }
    }

    fn usage_share(&self, summary: &UsageSummary) -> ChartSpec {
        let slices = vec![
            Slice {
                label: self.text("series-casual"),
                value: summary.totals.casual as f64,
                role: SeriesRole::Casual,
            },
            Slice {
                label: self.text("series-registered"),
                value: summary.totals.registered as f64,
                role: SeriesRole::Registered,
            },
        ];
        ChartSpec {
            id: ChartId::UsageShare,
            title: self.text("chart-usage-share-title"),
            x_label: String::new(),
            y_label: String::new(),
            kind: ChartKind::Pie { slices },
        }
    }

    fn daily_users(&self, summary: &UsageSummary) -> ChartSpec {
        self.spec(
            ChartId::DailyUsers,
            "chart-daily-title",
            "axis-date",
            "axis-user-count",
            ChartKind::Line {
                dates: summary.daily.iter().map(|r| r.key).collect(),
                series: self.rider_series(&summary.daily),
            },
        )
    }

    fn temperature_scatter(&self, summary: &UsageSummary) -> ChartSpec {
        let points = &summary.temperature_points;
        let series = vec![
            PointSeries {
                name: self.text("series-casual"),
                role: SeriesRole::Casual,
                points: points.iter().map(|p| (p.temp, f64::from(p.casual))).collect(),
            },
            PointSeries {
                name: self.text("series-registered"),
                role: SeriesRole::Registered,
                points: points
                    .iter()
                    .map(|p| (p.temp, f64::from(p.registered)))
                    .collect(),
            },
        ];
        self.spec(
            ChartId::TemperatureScatter,
            "chart-temp-scatter-title",
            "axis-temperature-normalized",
            "axis-user-count",
            ChartKind::Scatter { series },
        )
    }

    fn total_vs_temperature(&self, id: ChartId, summary: &UsageSummary) -> ChartSpec {
        let feels_like = id == ChartId::TotalVsAtemp;
        let (title, x_label, fit) = if feels_like {
            ("chart-total-vs-atemp-title", "axis-feels-like", summary.atemp_fit)
        } else {
            ("chart-total-vs-temp-title", "axis-temperature-normalized", summary.temp_fit)
        };
        let points = summary
            .temperature_usage
            .iter()
            .map(|t| (if feels_like { t.atemp } else { t.temp }, t.total as f64))
            .collect();
        self.spec(
            id,
            title,
            x_label,
            "axis-user-count",
            ChartKind::Regression {
                points,
                fit,
                point_role: SeriesRole::Registered,
                series_name: self.text("metric-total-users"),
                fit_name: self.text("series-fit"),
            },
        )
    }

    fn season_bars(&self, summary: &UsageSummary) -> ChartSpec {
        self.spec(
            ChartId::SeasonBars,
            "chart-season-title",
            "axis-season",
            "axis-count",
            ChartKind::GroupedBar {
                categories: summary
                    .by_season
                    .iter()
                    .map(|r| self.text(r.key.message_key()))
                    .collect(),
                series: self.rider_series(&summary.by_season),
            },
        )
    }

    fn weather_bars(&self, summary: &UsageSummary) -> ChartSpec {
        // Codes keep the axis readable; the page lists what each code means.
        self.spec(
            ChartId::WeatherBars,
            "chart-weather-title",
            "axis-weather",
            "axis-count",
            ChartKind::GroupedBar {
                categories: summary.by_weather.iter().map(|r| r.key.to_string()).collect(),
                series: self.rider_series(&summary.by_weather),
            },
        )
    }
}
