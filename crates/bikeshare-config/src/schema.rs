//! Configuration schema definitions using serde.
//!
//! Every section carries `#[serde(default)]`, so a file only needs to name
//! the values it changes.

use bikeshare_common::{LogFormat, LoggingConfig, RangePolicy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Main configuration structure for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Dataset configuration.
    #[validate]
    pub data: DataConfig,
    /// Output page configuration.
    #[validate]
    pub dashboard: DashboardConfig,
    /// Aggregate memoization configuration.
    pub cache: CacheConfig,
    /// Graph configuration.
    #[validate]
    pub graphs: GraphsConfig,
    /// Logging configuration.
    #[validate]
    pub logging: LoggingSection,
}

/// Dataset configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DataConfig {
    /// Path of the daily usage CSV file.
    #[validate(custom(function = "crate::validation::validate_path", message = "Dataset path cannot be empty"))]
    pub dataset_path: PathBuf,
    /// Handling of ranges reaching past the dataset bounds.
    pub range_policy: RangePolicy,
    /// Range rendered at startup; the full dataset when absent.
    pub initial_range: Option<InitialRange>,
}

/// Start and end of the range rendered at startup.
///
/// Kept separate from [`bikeshare_common::DateRange`] so that a reversed
/// pair deserializes and is reported by validation with its field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialRange {
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
}

/// Output page configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DashboardConfig {
    /// Language code for localization.
    #[validate(custom(function = "crate::validation::validate_language", message = "Language must be one of: en-US, id-ID"))]
    pub language: String,
    /// Directory with `<locale>/dashboard.ftl` files replacing the bundled translations.
    pub locales_dir: Option<PathBuf>,
    /// Directory receiving `index.html` and the other outputs.
    #[validate(custom(function = "crate::validation::validate_path", message = "Output directory cannot be empty"))]
    pub output_dir: PathBuf,
    /// Whether to write `summary.json` next to the page.
    pub write_summary_json: bool,
    /// Whether to write each chart to its own file.
    pub write_chart_files: bool,
    /// Format of standalone chart files.
    pub chart_format: ChartFormat,
}

/// File format of standalone chart files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    /// Scalable vector graphics.
    #[default]
    Svg,
    /// Portable network graphics.
    Png,
}

impl ChartFormat {
    /// File extension without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// Aggregate memoization configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether summaries are memoized per date range.
    pub enabled: bool,
    /// Maximum number of memoized summaries.
    pub max_capacity: u64,
}

/// Graph configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphsConfig {
    /// Chart width in pixels.
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,
    /// Chart height in pixels.
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,
    /// Styling configuration.
    #[validate]
    pub styling: StylingConfig,
}

/// Styling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StylingConfig {
    /// Whether to draw grid lines.
    pub enable_grid: bool,
    /// Font family for all chart text.
    #[validate(custom(function = "crate::validation::validate_not_blank", message = "Font family cannot be empty"))]
    pub font_family: String,
    /// Title font size in points.
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub title_font_size: u32,
    /// Color configuration.
    #[validate]
    pub colors: ColorsConfig,
}

/// Color configuration, `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ColorsConfig {
    /// Casual riders.
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Casual color must be a #RRGGBB hex color"))]
    pub casual: String,
    /// Registered riders.
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Registered color must be a #RRGGBB hex color"))]
    pub registered: String,
    /// Regression lines and their bands.
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Regression line color must be a #RRGGBB hex color"))]
    pub regression_line: String,
    /// Chart background.
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be a #RRGGBB hex color"))]
    pub background: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSection {
    /// Level filter, overridden by `RUST_LOG`.
    #[validate(custom(function = "crate::validation::validate_not_blank", message = "Log level cannot be empty"))]
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Optional log file, appended to.
    pub file_path: Option<String>,
}

impl LoggingSection {
    /// Convert into the subscriber settings used by `init_logging`.
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            format: self.format,
            file_path: self.file_path.clone(),
            ..LoggingConfig::default()
        }
    }
}
