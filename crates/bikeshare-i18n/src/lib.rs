//! Internationalization support for the bike-sharing dashboard
//!
//! This crate wraps the Fluent localization system:
//!
//! - Locale management (English and Indonesian)
//! - Embedded Fluent resources, optionally overridden from a directory
//! - Thread-safe FluentBundle management
//! - Fallback to the default locale for missing translations
//!
//! # Example
//!
//! ```rust
//! use bikeshare_i18n::{I18nManager, Locale};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = I18nManager::new(Locale::English)?;
//! let title = manager.get_message("dashboard-title", Locale::Indonesian, None)?;
//! assert_eq!(title, "Analisis Dataset Bike Sharing");
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod error;
pub mod locale;
pub mod manager;
pub mod resource;

pub use bundle::{fluent_args, BundleManager};
pub use error::{I18nError, I18nResult};
pub use locale::Locale;
pub use manager::I18nManager;
pub use resource::ResourceManager;

// Re-export commonly used Fluent types
pub use fluent_bundle::{FluentArgs, FluentValue};
