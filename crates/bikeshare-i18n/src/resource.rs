//! Resource management for Fluent files
//!
//! Translations are compiled into the binary. A locales directory may be
//! supplied to override them; a locale missing from that directory falls
//! back to its embedded resource.

use crate::error::{I18nError, I18nResult};
use crate::Locale;
use fluent_bundle::FluentResource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

const EN_US: &str = include_str!("../locales/en-US/dashboard.ftl");
const ID_ID: &str = include_str!("../locales/id-ID/dashboard.ftl");

/// Embedded Fluent source for a locale
pub const fn embedded_source(locale: Locale) -> &'static str {
    match locale {
        Locale::English => EN_US,
        Locale::Indonesian => ID_ID,
    }
}

/// Manages loading of Fluent resources
#[derive(Debug, Default)]
pub struct ResourceManager {
    /// Optional directory overriding the embedded resources
    base_dir: Option<PathBuf>,
}

impl ResourceManager {
    /// Resources from the embedded translations only
    pub const fn embedded() -> Self {
        Self { base_dir: None }
    }

    /// Resources from `base_dir`, falling back to the embedded translations
    pub fn with_base_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: Some(base_dir.as_ref().to_path_buf()),
        }
    }

    /// Load a resource for the given locale
    pub fn load_resource(&self, locale: Locale) -> I18nResult<FluentResource> {
        let source = match self.override_path(locale) {
            Some(path) => {
                debug!("Loading resource file: {:?}", path);
                fs::read_to_string(&path).map_err(|source| I18nError::ResourceLoadError {
                    path: path.to_string_lossy().to_string(),
                    source,
                })?
            }
            None => embedded_source(locale).to_string(),
        };

        let resource = parse_resource(source)?;
        info!(locale = %locale, "Loaded Fluent resource");
        Ok(resource)
    }

    fn override_path(&self, locale: Locale) -> Option<PathBuf> {
        self.base_dir
            .as_ref()
            .map(|dir| dir.join(locale.resource_file()))
            .filter(|path| path.exists())
    }
}

fn parse_resource(source: String) -> I18nResult<FluentResource> {
    FluentResource::try_new(source).map_err(|(_, errors)| {
        let error_messages: Vec<String> = errors.into_iter().map(|e| format!("{e:?}")).collect();
        error!("Failed to parse Fluent resource: {:?}", error_messages);
        I18nError::FluentParseError {
            errors: error_messages,
        }
    })
}
