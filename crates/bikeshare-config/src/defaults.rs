//! Default values for every configuration section.

use crate::schema::*;
use bikeshare_common::{LogFormat, RangePolicy};
use std::path::PathBuf;

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Dataset path used when none is configured.
pub const DEFAULT_DATASET_PATH: &str = "data/day.csv";

/// Output directory used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            dashboard: DashboardConfig::default(),
            cache: CacheConfig::default(),
            graphs: GraphsConfig::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            range_policy: RangePolicy::Clamp,
            initial_range: None,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            locales_dir: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            write_summary_json: true,
            write_chart_files: false,
            chart_format: ChartFormat::Svg,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity: 64,
        }
    }
}

impl Default for GraphsConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            styling: StylingConfig::default(),
        }
    }
}

impl Default for StylingConfig {
    fn default() -> Self {
        Self {
            enable_grid: true,
            font_family: "sans-serif".to_string(),
            title_font_size: 22,
            colors: ColorsConfig::default(),
        }
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            casual: "#FF6F61".to_string(),
            registered: "#6A5ACD".to_string(),
            regression_line: "#FF0000".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file_path: None,
        }
    }
}
