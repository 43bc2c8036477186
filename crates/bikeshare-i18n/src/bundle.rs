//! FluentBundle management and message formatting

use crate::error::{I18nError, I18nResult};
use crate::Locale;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use tracing::{debug, error, warn};

type Bundle = FluentBundle<FluentResource>;

/// Owns one thread-safe FluentBundle per loaded locale
pub struct BundleManager {
    bundles: HashMap<Locale, Bundle>,
}

impl std::fmt::Debug for BundleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleManager")
            .field("locales", &self.bundles.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BundleManager {
    /// Create a new BundleManager
    pub fn new() -> Self {
        Self {
            bundles: HashMap::new(),
        }
    }

    /// Add a resource to a locale's bundle, creating the bundle on first use
    pub fn add_resource(&mut self, locale: Locale, resource: FluentResource) -> I18nResult<()> {
        let lang_id = locale.to_language_identifier()?;

        let bundle = self.bundles.entry(locale).or_insert_with(|| {
            let mut bundle = FluentBundle::new_concurrent(vec![lang_id]);
            // Plain text output; the page is not bidirectional
            bundle.set_use_isolating(false);
            bundle
        });

        bundle.add_resource(resource).map_err(|errors| {
            let error_messages: Vec<String> = errors.into_iter().map(|e| format!("{e:?}")).collect();
            error!("Failed to add resource to bundle: {:?}", error_messages);
            I18nError::BundleCreationError {
                locale: locale.code().to_string(),
                errors: error_messages,
            }
        })?;

        debug!("Added resource to bundle for locale: {:?}", locale);
        Ok(())
    }

    /// Format a message with the given arguments
    pub fn format_message(
        &self,
        locale: Locale,
        message_id: &str,
        args: Option<&FluentArgs>,
    ) -> I18nResult<String> {
        let not_found = || I18nError::MessageNotFound {
            key: message_id.to_string(),
        };

        let bundle = self.bundles.get(&locale).ok_or_else(not_found)?;
        let message = bundle.get_message(message_id).ok_or_else(not_found)?;
        let pattern = message.value().ok_or_else(not_found)?;

        let mut errors = Vec::new();
        let formatted = bundle.format_pattern(pattern, args, &mut errors);

        if !errors.is_empty() {
            let error_messages: Vec<String> = errors.into_iter().map(|e| format!("{e:?}")).collect();
            warn!(
                "Formatting errors for message '{}': {:?}",
                message_id, error_messages
            );
            return Err(I18nError::MessageFormatError {
                key: message_id.to_string(),
                errors: error_messages,
            });
        }

        Ok(formatted.into_owned())
    }

    /// Check if a message exists in the bundle
    pub fn has_message(&self, locale: Locale, message_id: &str) -> bool {
        self.bundles
            .get(&locale)
            .is_some_and(|bundle| bundle.has_message(message_id))
    }

    /// Get all loaded locales
    pub fn available_locales(&self) -> Vec<Locale> {
        self.bundles.keys().copied().collect()
    }
}

impl Default for BundleManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper function to create FluentArgs from key-value pairs
pub fn fluent_args<'a>(args: &[(&'a str, FluentValue<'a>)]) -> FluentArgs<'a> {
    let mut fluent_args = FluentArgs::new();
    for (key, value) in args {
        fluent_args.set(*key, value.clone());
    }
    fluent_args
}

/// Macro to create FluentArgs more easily
#[macro_export]
macro_rules! fluent_args {
    () => {
        None
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::FluentArgs::new();
        $(
            args.set($key, $value);
        )+
        Some(args)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(source: &str) -> FluentResource {
        FluentResource::try_new(source.to_string()).unwrap()
    }

    #[test]
    fn test_format_with_args() {
        let mut manager = BundleManager::new();
        manager
            .add_resource(Locale::English, resource("greeting = From { $start } to { $end }\n"))
            .unwrap();

        let args = fluent_args(&[
            ("start", FluentValue::from("2011-01-01")),
            ("end", FluentValue::from("2011-12-31")),
        ]);
        let text = manager
            .format_message(Locale::English, "greeting", Some(&args))
            .unwrap();
        assert_eq!(text, "From 2011-01-01 to 2011-12-31");
    }

    #[test]
    fn test_missing_argument_is_format_error() {
        let mut manager = BundleManager::new();
        manager
            .add_resource(Locale::English, resource("greeting = Hi { $name }\n"))
            .unwrap();
        assert!(matches!(
            manager.format_message(Locale::English, "greeting", None),
            Err(I18nError::MessageFormatError { .. })
        ));
    }

    #[test]
    fn test_duplicate_message_rejected() {
        let mut manager = BundleManager::new();
        manager
            .add_resource(Locale::English, resource("a = one\n"))
            .unwrap();
        assert!(manager
            .add_resource(Locale::English, resource("a = two\n"))
            .is_err());
        assert!(manager.has_message(Locale::English, "a"));
        assert!(!manager.has_message(Locale::Indonesian, "a"));
    }
}
