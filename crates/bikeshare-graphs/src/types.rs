//! Chart specifications and styling shared by the chart catalog and renderer

use crate::regression::LinearFit;
use bikeshare_common::{DashboardError, Result};
use bikeshare_config::{parse_hex_color, GraphsConfig};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Identifies one chart of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartId {
    /// Casual versus registered pie
    UsageShare,
    /// Daily casual and registered counts
    DailyUsers,
    /// Casual and registered counts against temperature
    TemperatureScatter,
    /// Total usage against temperature with fit
    TotalVsTemp,
    /// Total usage against feels-like temperature with fit
    TotalVsAtemp,
    /// Totals per season
    SeasonBars,
    /// Totals per weather situation
    WeatherBars,
}

impl ChartId {
    /// Every chart in page order
    pub const fn all() -> [Self; 7] {
        [
            Self::UsageShare,
            Self::DailyUsers,
            Self::TemperatureScatter,
            Self::TotalVsTemp,
            Self::TotalVsAtemp,
            Self::SeasonBars,
            Self::WeatherBars,
        ]
    }

    /// Stable slug used for element ids and file names
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UsageShare => "usage-share",
            Self::DailyUsers => "daily-users",
            Self::TemperatureScatter => "temperature-scatter",
            Self::TotalVsTemp => "total-vs-temp",
            Self::TotalVsAtemp => "total-vs-atemp",
            Self::SeasonBars => "season-bars",
            Self::WeatherBars => "weather-bars",
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rider group a series belongs to; decides its color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesRole {
    /// Casual riders
    Casual,
    /// Registered riders
    Registered,
}

/// A named series of values aligned with the chart's categories or dates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Legend label
    pub name: String,
    /// Rider group
    pub role: SeriesRole,
    /// One value per date or category
    pub values: Vec<f64>,
}

/// A named series of `(x, y)` points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSeries {
    /// Legend label
    pub name: String,
    /// Rider group
    pub role: SeriesRole,
    /// Points to draw
    pub points: Vec<(f64, f64)>,
}

/// One slice of a pie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    /// Slice label
    pub label: String,
    /// Slice size
    pub value: f64,
    /// Rider group
    pub role: SeriesRole,
}

/// Chart shape with its data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    /// Proportion chart
    Pie {
        /// Slices in drawing order
        slices: Vec<Slice>,
    },
    /// Time series with markers
    Line {
        /// X axis dates
        dates: Vec<NaiveDate>,
        /// Series aligned with `dates`
        series: Vec<Series>,
    },
    /// Point cloud, one series per rider group
    Scatter {
        /// Point series
        series: Vec<PointSeries>,
    },
    /// Points with a fitted line and band
    Regression {
        /// Observed points
        points: Vec<(f64, f64)>,
        /// Fit through `points`, absent when it cannot be computed
        fit: Option<LinearFit>,
        /// Color of the points
        point_role: SeriesRole,
        /// Legend label of the points
        series_name: String,
        /// Legend label of the fit
        fit_name: String,
    },
    /// Side-by-side bars per category
    GroupedBar {
        /// Category labels along the x axis
        categories: Vec<String>,
        /// Series aligned with `categories`
        series: Vec<Series>,
    },
}

/// A fully localized chart ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Chart identity
    pub id: ChartId,
    /// Caption
    pub title: String,
    /// X axis description
    pub x_label: String,
    /// Y axis description
    pub y_label: String,
    /// Shape and data
    pub kind: ChartKind,
}

/// An RGB triple
pub type Rgb = (u8, u8, u8);

/// Resolved styling for rendering, with colors parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Whether grid lines are drawn
    pub enable_grid: bool,
    /// Font family for all text
    pub font_family: String,
    /// Caption font size
    pub title_font_size: u32,
    /// Casual riders
    pub casual: Rgb,
    /// Registered riders
    pub registered: Rgb,
    /// Fitted lines and bands
    pub regression_line: Rgb,
    /// Background fill
    pub background: Rgb,
}

impl ChartStyle {
    /// Resolve the graph configuration, failing on malformed colors
    pub fn from_config(config: &GraphsConfig) -> Result<Self> {
        let styling = &config.styling;
        let color = |field: &str, value: &str| {
            parse_hex_color(value).ok_or_else(|| {
                DashboardError::validation_field(
                    format!("'{value}' is not a #RRGGBB color"),
                    format!("graphs.styling.colors.{field}"),
                )
            })
        };
        Ok(Self {
            width: config.width,
            height: config.height,
            enable_grid: styling.enable_grid,
            font_family: styling.font_family.clone(),
            title_font_size: styling.title_font_size,
            casual: color("casual", &styling.colors.casual)?,
            registered: color("registered", &styling.colors.registered)?,
            regression_line: color("regression_line", &styling.colors.regression_line)?,
            background: color("background", &styling.colors.background)?,
        })
    }

    /// Color of a rider group
    pub const fn role_color(&self, role: SeriesRole) -> Rgb {
        match role {
            SeriesRole::Casual => self.casual,
            SeriesRole::Registered => self.registered,
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            enable_grid: true,
            font_family: "sans-serif".to_string(),
            title_font_size: 22,
            casual: (0xFF, 0x6F, 0x61),
            registered: (0x6A, 0x5A, 0xCD),
            regression_line: (0xFF, 0x00, 0x00),
            background: (0xFF, 0xFF, 0xFF),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_matches_default_config() {
        let style = ChartStyle::from_config(&GraphsConfig::default()).unwrap();
        assert_eq!(style, ChartStyle::default());
        assert_eq!(style.role_color(SeriesRole::Registered), (0x6A, 0x5A, 0xCD));
    }

    #[test]
    fn test_bad_color_names_field() {
        let mut config = GraphsConfig::default();
        config.styling.colors.background = "white".to_string();
        let err = ChartStyle::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Validation { field: Some(ref f), .. } if f == "graphs.styling.colors.background"
        ));
    }

    #[test]
    fn test_chart_ids_are_unique() {
        let mut slugs: Vec<_> = ChartId::all().iter().map(|id| id.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), 7);
    }
}
