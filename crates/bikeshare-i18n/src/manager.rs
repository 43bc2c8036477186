//! Internationalization manager

use crate::bundle::BundleManager;
use crate::error::{I18nError, I18nResult};
use crate::resource::ResourceManager;
use crate::Locale;
use fluent_bundle::FluentArgs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Manages internationalization for the application
#[derive(Debug)]
pub struct I18nManager {
    /// Default locale to fall back to
    default_locale: Locale,
    /// Resource loader for Fluent files
    resource_manager: ResourceManager,
    /// Bundle manager for handling FluentBundles
    bundle_manager: BundleManager,
}

impl I18nManager {
    /// Create a manager with every supported locale loaded from the embedded
    /// translations
    pub fn new(default_locale: Locale) -> I18nResult<Self> {
        Self::with_resources(default_locale, ResourceManager::embedded())
    }

    /// Create a manager whose translations may be overridden from `locales_dir`
    pub fn with_locales_dir<P: AsRef<Path>>(
        default_locale: Locale,
        locales_dir: P,
    ) -> I18nResult<Self> {
        Self::with_resources(default_locale, ResourceManager::with_base_dir(locales_dir))
    }

    fn with_resources(
        default_locale: Locale,
        resource_manager: ResourceManager,
    ) -> I18nResult<Self> {
        let mut manager = Self {
            default_locale,
            resource_manager,
            bundle_manager: BundleManager::new(),
        };

        // The default locale must load; the others are best effort
        manager.load_locale(default_locale)?;
        for locale in Locale::all() {
            if locale != default_locale {
                if let Err(e) = manager.load_locale(locale) {
                    warn!("Failed to load locale {:?}: {}", locale, e);
                }
            }
        }

        info!("I18nManager initialized with default locale: {:?}", default_locale);
        Ok(manager)
    }

    /// Load a locale's resources
    pub fn load_locale(&mut self, locale: Locale) -> I18nResult<()> {
        debug!("Loading locale: {:?}", locale);
        let resource = self.resource_manager.load_resource(locale)?;
        self.bundle_manager.add_resource(locale, resource)
    }

    /// Get a localized message
    pub fn get_message(
        &self,
        key: &str,
        locale: Locale,
        args: Option<&FluentArgs>,
    ) -> I18nResult<String> {
        if self.bundle_manager.has_message(locale, key) {
            return self.bundle_manager.format_message(locale, key, args);
        }

        if locale != self.default_locale && self.bundle_manager.has_message(self.default_locale, key)
        {
            warn!(
                "Message '{}' not found in locale {:?}, falling back to default locale {:?}",
                key, locale, self.default_locale
            );
            return self
                .bundle_manager
                .format_message(self.default_locale, key, args);
        }

        Err(I18nError::MessageNotFound {
            key: key.to_string(),
        })
    }

    /// Get a localized message with fallback to a default message
    pub fn get_message_or_default(
        &self,
        key: &str,
        locale: Locale,
        args: Option<&FluentArgs>,
        default: &str,
    ) -> String {
        self.get_message(key, locale, args).unwrap_or_else(|_| {
            warn!("Message '{}' not found, using default: '{}'", key, default);
            default.to_string()
        })
    }

    /// Get a localized message without arguments, or the key itself when missing
    pub fn text(&self, key: &str, locale: Locale) -> String {
        self.get_message_or_default(key, locale, None, key)
    }

    /// Check if a message exists for the given locale
    pub fn has_message(&self, key: &str, locale: Locale) -> bool {
        self.bundle_manager.has_message(locale, key)
            || (locale != self.default_locale
                && self.bundle_manager.has_message(self.default_locale, key))
    }

    /// Get the default locale
    pub const fn default_locale(&self) -> Locale {
        self.default_locale
    }

    /// Get all loaded locales
    pub fn loaded_locales(&self) -> Vec<Locale> {
        self.bundle_manager.available_locales()
    }
}
