//! Configuration loading utilities

use crate::schema::Config;
use crate::validation::ValidationIssue;
use bikeshare_common::{DashboardError, Result as DashboardResult};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "BIKESHARE_CONFIG_PATH";

/// Files probed in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["config.yaml", "config.yml", "config.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// File extension other than yaml, yml or toml
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Configuration validation error
    #[error("Configuration validation failed: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ConfigError> for DashboardError {
    fn from(err: ConfigError) -> Self {
        Self::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration file syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` or `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content, format)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration text without overrides or validation
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
        Ok(match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        })
    }

    /// Load configuration from `BIKESHARE_CONFIG_PATH`, a default file in
    /// the working directory, or built-in defaults, in that order
    pub fn load() -> DashboardResult<Config> {
        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            return Ok(Self::load_config(config_path)?);
        }

        if let Some(found) = DEFAULT_CONFIG_FILES
            .iter()
            .map(Path::new)
            .find(|candidate| candidate.exists())
        {
            return Ok(Self::load_config(found)?);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> DashboardResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply `BIKESHARE_*` environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |var| env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("BIKESHARE_DATASET") {
            config.data.dataset_path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("BIKESHARE_OUTPUT_DIR") {
            config.dashboard.output_dir = PathBuf::from(dir);
        }

        if let Some(language) = lookup("BIKESHARE_LANGUAGE") {
            config.dashboard.language = language;
        }

        if let Some(policy) = parse_var(&lookup, "BIKESHARE_RANGE_POLICY")? {
            config.data.range_policy = policy;
        }

        if let Some(level) = lookup("BIKESHARE_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(enabled) = parse_var(&lookup, "BIKESHARE_CACHE_ENABLED")? {
            config.cache.enabled = enabled;
        }

        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(var)
        .map(|raw| {
            raw.trim().parse().map_err(|e| ConfigError::EnvParseError {
                var: var.to_string(),
                source: Box::new(e),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_common::RangePolicy;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config_file(content: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = "data:\n  dataset_path: data/day.csv\n  range_policy: reject\ndashboard:\n  language: id-ID\n";
        let config = ConfigLoader::parse(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.data.range_policy, RangePolicy::Reject);
        assert_eq!(config.dashboard.language, "id-ID");
        assert_eq!(config.graphs.width, 1000);
    }

    #[test]
    fn test_parse_toml() {
        let toml = "[graphs]\nwidth = 1200\n\n[graphs.styling.colors]\ncasual = \"#112233\"\n";
        let config = ConfigLoader::parse(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.graphs.width, 1200);
        assert_eq!(config.graphs.styling.colors.casual, "#112233");
        assert_eq!(config.graphs.styling.colors.registered, "#6A5ACD");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/config.YML")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("config.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let temp_file = create_test_config_file("data:\n  dataset_path: [unclosed", ".yaml");
        let result = ConfigLoader::load_config(temp_file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::YamlError(_)));
    }

    #[test]
    fn test_validation_error_from_file() {
        let temp_file = create_test_config_file("graphs:\n  width: 5\n", ".yaml");
        let result = ConfigLoader::load_config(temp_file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        let lookup = lookup_from(&[
            ("BIKESHARE_DATASET", "/srv/day.csv"),
            ("BIKESHARE_LANGUAGE", "id-ID"),
            ("BIKESHARE_RANGE_POLICY", "reject"),
            ("BIKESHARE_CACHE_ENABLED", "false"),
            ("BIKESHARE_LOG_LEVEL", "debug"),
        ]);
        ConfigLoader::apply_overrides_from(&mut config, lookup).unwrap();

        assert_eq!(config.data.dataset_path, PathBuf::from("/srv/day.csv"));
        assert_eq!(config.dashboard.language, "id-ID");
        assert_eq!(config.data.range_policy, RangePolicy::Reject);
        assert!(!config.cache.enabled);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_env_parse_error() {
        let mut config = Config::default();
        let lookup = lookup_from(&[("BIKESHARE_CACHE_ENABLED", "sometimes")]);
        let result = ConfigLoader::apply_overrides_from(&mut config, lookup);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::EnvParseError { var, .. } if var == "BIKESHARE_CACHE_ENABLED"
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let result = ConfigLoader::load_config("/nonexistent/path/config.yaml");
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_config_error_converts_to_dashboard_error() {
        let err: DashboardError = ConfigError::UnsupportedFormat(PathBuf::from("x.ini")).into();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("Configuration error"));
    }
}
