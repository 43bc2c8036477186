//! Error types and utilities for the dashboard workspace

use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Dataset loading errors (missing file, missing columns, bad rows)
    #[error("Load error: {message}")]
    Load {
        message: String,
        path: Option<String>,
        row: Option<usize>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A date range that cannot be used for filtering
    #[error("Invalid date range: {message}")]
    InvalidRange { message: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Graph generation and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internationalization and localization errors
    #[error("Localization error: {message}")]
    Localization {
        message: String,
        locale: Option<String>,
    },

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DashboardError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new load error
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load {
            message: msg.into(),
            path: None,
            row: None,
            source: None,
        }
    }

    /// Create a new load error pointing at a data row (1-based)
    pub fn load_at_row(msg: impl Into<String>, row: usize) -> Self {
        Self::Load {
            message: format!("row {row}: {}", msg.into()),
            path: None,
            row: Some(row),
            source: None,
        }
    }

    /// Create a new load error for a file path with source
    pub fn load_with_source(
        msg: impl Into<String>,
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Load {
            message: msg.into(),
            path: Some(path.into()),
            row: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach the dataset path to a load error; other variants pass through
    #[must_use]
    pub fn at_path(self, dataset_path: impl Into<String>) -> Self {
        match self {
            Self::Load {
                message,
                path: None,
                row,
                source,
            } => Self::Load {
                message,
                path: Some(dataset_path.into()),
                row,
                source,
            },
            other => other,
        }
    }

    /// Create a new invalid range error
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange {
            message: msg.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new localization error
    pub fn localization(msg: impl Into<String>) -> Self {
        Self::Localization {
            message: msg.into(),
            locale: None,
        }
    }

    /// Create a new localization error with locale
    pub fn localization_with_locale(msg: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::Localization {
            message: msg.into(),
            locale: Some(locale.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error should abort startup rather than be shown to the viewer
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Load { .. } | Self::Config { .. })
    }
}

// Error conversion implementations for external types

/// Convert from csv::Error to DashboardError
impl From<csv::Error> for DashboardError {
    fn from(err: csv::Error) -> Self {
        let row = err
            .position()
            .map(|pos| usize::try_from(pos.record()).unwrap_or(usize::MAX));
        Self::Load {
            message: "Malformed CSV input".to_string(),
            path: None,
            row,
            source: Some(Box::new(err)),
        }
    }
}

/// Convert from toml::de::Error to DashboardError
impl From<toml::de::Error> for DashboardError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

/// Convert from serde_yaml::Error to DashboardError
impl From<serde_yaml::Error> for DashboardError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to DashboardError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for DashboardError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = DashboardError::new("test message");
        assert!(error.to_string().contains("test message"));

        let config_error = DashboardError::config("config issue");
        assert!(config_error.to_string().contains("Configuration error"));
        assert!(config_error.to_string().contains("config issue"));

        let load_error = DashboardError::load_at_row("unparsable date '2011-13-01'", 4);
        assert_eq!(
            load_error.to_string(),
            "Load error: row 4: unparsable date '2011-13-01'"
        );

        let range_error = DashboardError::invalid_range("start after end");
        assert_eq!(range_error.to_string(), "Invalid date range: start after end");

        let validation_error = DashboardError::validation_field("Invalid input", "graphs.width");
        assert!(validation_error.to_string().contains("Validation error"));
        assert!(validation_error.to_string().contains("Invalid input"));

        let localization_error =
            DashboardError::localization_with_locale("Translation missing", "id-ID");
        assert!(localization_error.to_string().contains("Localization error"));
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped_error = DashboardError::with_source("Failed to read file", io_error);

        assert!(wrapped_error.to_string().contains("Failed to read file"));
        assert!(wrapped_error.source().is_some());

        let load_error = DashboardError::load_with_source(
            "Cannot open dataset",
            "data/day.csv",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(load_error.source().is_some());
        assert!(load_error.is_fatal());
    }

    #[test]
    fn test_at_path_only_touches_load_errors() {
        let error = DashboardError::load_at_row("bad season", 2).at_path("day.csv");
        match error {
            DashboardError::Load { path, row, .. } => {
                assert_eq!(path.as_deref(), Some("day.csv"));
                assert_eq!(row, Some(2));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let error = DashboardError::invalid_range("x").at_path("day.csv");
        assert!(matches!(error, DashboardError::InvalidRange { .. }));
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: DashboardError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let invalid_json = r#"{"invalid": json}"#;
        let serde_error = serde_json::from_str::<serde_json::Value>(invalid_json).unwrap_err();
        let error: DashboardError = serde_error.into();

        assert!(error.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<Vec<u32>>("{not: [a list").unwrap_err();
        let error: DashboardError = yaml_error.into();
        assert!(matches!(error, DashboardError::Config { .. }));
    }

    #[test]
    fn test_error_display_formatting() {
        let error = DashboardError::new("test error");
        assert_eq!(format!("{error}"), "test error");

        let config_error = DashboardError::config("missing field");
        assert_eq!(
            format!("{config_error}"),
            "Configuration error: missing field"
        );
    }
}
