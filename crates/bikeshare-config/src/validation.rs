//! Validation rules and patterns for a loaded configuration.
//!
//! Per-field rules are declared with `#[validate(...)]` on the schema;
//! rules spanning several fields live in [`Config::validate_all`].

use crate::loader::ConfigError;
use crate::schema::Config;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Language codes with bundled translations.
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en-US", "id-ID"];

/// Regex pattern for `#RRGGBB` colors (e.g. #FFFFFF, #6a5acd)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// A single rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path of the offending field, e.g. `graphs.width`.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Parse a `#RRGGBB` color into its components.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    if !HEX_COLOR_REGEX.is_match(value) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&value[i..i + 2], 16).ok();
    Some((channel(1)?, channel(3)?, channel(5)?))
}

/// Validate that a configured path is not empty
pub fn validate_path(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::new("empty_path"));
    }
    Ok(())
}

/// Validate that a language code has bundled translations
pub fn validate_language(language: &str) -> Result<(), ValidationError> {
    if SUPPORTED_LANGUAGES.contains(&language) {
        Ok(())
    } else {
        Err(ValidationError::new("unsupported_language"))
    }
}

/// Validate that a value is not empty or whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn collect_issues(prefix: &str, errors: &ValidationErrors, issues: &mut Vec<ValidationIssue>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            (*field).to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                issues.extend(field_errors.iter().map(|error| ValidationIssue {
                    field: path.clone(),
                    message: error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_issues(&path, nested, issues),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_issues(&format!("{path}[{index}]"), nested, issues);
                }
            }
        }
    }
}

impl Config {
    /// Validate the configuration, reporting every rejected field at once.
    ///
    /// Issues are ordered by field path.
    pub fn validate_all(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();
        if let Err(errors) = self.validate() {
            collect_issues("", &errors, &mut issues);
        }

        if let Some(initial) = &self.data.initial_range {
            if initial.start > initial.end {
                issues.push(ValidationIssue {
                    field: "data.initial_range".to_string(),
                    message: format!("start {} is after end {}", initial.start, initial.end),
                });
            }
        }
        if self.cache.enabled && self.cache.max_capacity == 0 {
            issues.push(ValidationIssue {
                field: "cache.max_capacity".to_string(),
                message: "must be positive when the cache is enabled".to_string(),
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            issues.sort_by(|a, b| a.field.cmp(&b.field));
            Err(ConfigError::Validation(issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::InitialRange;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF6F61"), Some((0xFF, 0x6F, 0x61)));
        assert_eq!(parse_hex_color("#6a5acd"), Some((0x6A, 0x5A, 0xCD)));
        assert_eq!(parse_hex_color("FF6F61"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
        assert_eq!(parse_hex_color("#FF6F61 "), None);
    }

    #[test]
    fn test_all_issues_reported() {
        let mut config = Config::default();
        config.graphs.width = 10;
        config.graphs.styling.colors.background = "white".to_string();
        config.dashboard.language = "fr-FR".to_string();

        let Err(ConfigError::Validation(issues)) = config.validate_all() else {
            panic!("expected validation failure");
        };
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "dashboard.language",
                "graphs.styling.colors.background",
                "graphs.width",
            ]
        );
        assert_eq!(issues[2].message, "Width must be between 100 and 4000 pixels");
    }

    #[test]
    fn test_field_rules() {
        let mut config = Config::default();
        config.graphs.styling.title_font_size = 100;
        config.graphs.styling.font_family = "  ".to_string();
        config.logging.level = String::new();
        config.data.dataset_path = "".into();

        let Err(ConfigError::Validation(issues)) = config.validate_all() else {
            panic!("expected validation failure");
        };
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "data.dataset_path",
                "graphs.styling.font_family",
                "graphs.styling.title_font_size",
                "logging.level",
            ]
        );
    }

    #[test]
    fn test_reversed_initial_range_rejected() {
        let mut config = Config::default();
        config.data.initial_range = Some(InitialRange {
            start: NaiveDate::from_ymd_opt(2012, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
        });
        let Err(ConfigError::Validation(issues)) = config.validate_all() else {
            panic!("expected validation failure");
        };
        assert_eq!(issues[0].field, "data.initial_range");
    }

    #[test]
    fn test_zero_capacity_allowed_when_cache_disabled() {
        let mut config = Config::default();
        config.cache.max_capacity = 0;
        assert!(config.validate_all().is_err());
        config.cache.enabled = false;
        assert!(config.validate_all().is_ok());
    }
}
