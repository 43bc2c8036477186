//! Error types for internationalization operations

use bikeshare_common::DashboardError;
use thiserror::Error;

/// Errors that can occur during internationalization operations
#[derive(Error, Debug)]
pub enum I18nError {
    /// Failed to parse a language identifier
    #[error("Invalid language identifier: {0}")]
    InvalidLanguageId(String),

    /// Language code with no bundled translation
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Failed to load a resource file
    #[error("Failed to load resource file: {path}")]
    ResourceLoadError {
        /// Path that could not be read
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a Fluent resource
    #[error("Failed to parse Fluent resource: {errors:?}")]
    FluentParseError {
        /// Parser diagnostics
        errors: Vec<String>,
    },

    /// Message not found in any bundle
    #[error("Message not found: {key}")]
    MessageNotFound {
        /// Message identifier
        key: String,
    },

    /// Failed to format a message
    #[error("Failed to format message '{key}': {errors:?}")]
    MessageFormatError {
        /// Message identifier
        key: String,
        /// Resolver diagnostics
        errors: Vec<String>,
    },

    /// Bundle creation failed
    #[error("Failed to create bundle for locale {locale}: {errors:?}")]
    BundleCreationError {
        /// Locale code
        locale: String,
        /// Bundle diagnostics
        errors: Vec<String>,
    },
}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;

impl From<I18nError> for DashboardError {
    fn from(err: I18nError) -> Self {
        match &err {
            I18nError::BundleCreationError { locale, .. } => {
                Self::localization_with_locale(err.to_string(), locale.clone())
            }
            _ => Self::localization(err.to_string()),
        }
    }
}
