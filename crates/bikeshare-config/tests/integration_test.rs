//! Integration tests for bikeshare-config crate.

use bikeshare_common::test_utils::{create_temp_dir, write_file};
use bikeshare_common::{LogFormat, RangePolicy};
use bikeshare_config::{ChartFormat, Config, ConfigError, ConfigLoader};
use chrono::NaiveDate;

const FULL_YAML: &str = r##"
data:
  dataset_path: data/day.csv
  range_policy: reject
  initial_range:
    start: 2011-01-01
    end: 2011-03-31
dashboard:
  language: id-ID
  output_dir: public
  write_summary_json: false
  write_chart_files: true
  chart_format: png
cache:
  enabled: true
  max_capacity: 16
graphs:
  width: 1200
  height: 600
  styling:
    enable_grid: false
    font_family: serif
    title_font_size: 18
    colors:
      casual: "#FF6F61"
      registered: "#6A5ACD"
      regression_line: "#FF0000"
      background: "#FAFAFA"
logging:
  level: debug
  format: json
"##;

#[test]
fn test_full_yaml_file() {
    let dir = create_temp_dir();
    let path = write_file(dir.path(), "config.yaml", FULL_YAML);
    let config = ConfigLoader::load_config(&path).expect("valid config");

    let initial = config.data.initial_range.expect("initial range");
    assert_eq!(initial.start, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
    assert_eq!(initial.end, NaiveDate::from_ymd_opt(2011, 3, 31).unwrap());
    assert_eq!(config.data.range_policy, RangePolicy::Reject);
    assert_eq!(config.dashboard.chart_format, ChartFormat::Png);
    assert_eq!(config.dashboard.chart_format.extension(), "png");
    assert!(!config.dashboard.write_summary_json);
    assert_eq!(config.cache.max_capacity, 16);
    assert!(!config.graphs.styling.enable_grid);
    assert_eq!(config.logging.format, LogFormat::Json);

    let logging = config.logging.to_logging_config();
    assert_eq!(logging.format, LogFormat::Json);
}

#[test]
fn test_yaml_and_toml_agree() {
    let dir = create_temp_dir();
    let yaml = write_file(
        dir.path(),
        "a.yml",
        "dashboard:\n  output_dir: site\ngraphs:\n  height: 700\n",
    );
    let toml = write_file(
        dir.path(),
        "b.toml",
        "[dashboard]\noutput_dir = \"site\"\n\n[graphs]\nheight = 700\n",
    );
    let from_yaml = ConfigLoader::load_from_file(&yaml).unwrap();
    let from_toml = ConfigLoader::load_from_file(&toml).unwrap();
    assert_eq!(from_yaml, from_toml);
}

#[test]
fn test_empty_file_yields_defaults() {
    let dir = create_temp_dir();
    let path = write_file(dir.path(), "config.toml", "");
    let config = ConfigLoader::load_config(&path).unwrap();
    assert_eq!(config, {
        let mut expected = Config::default();
        ConfigLoader::apply_env_overrides(&mut expected).unwrap();
        expected
    });
}

#[test]
fn test_bad_color_is_reported_with_field() {
    let dir = create_temp_dir();
    let path = write_file(
        dir.path(),
        "config.yaml",
        "graphs:\n  styling:\n    colors:\n      casual: coral\n",
    );
    let err = ConfigLoader::load_config(&path).unwrap_err();
    match err {
        ConfigError::Validation(issues) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].field, "graphs.styling.colors.casual");
        }
        other => panic!("unexpected error: {other}"),
    }
}
