//! # Bikeshare Config
//!
//! Configuration management for the bike-sharing dashboard.
//!
//! Configuration is read from a YAML or TOML file, overridden from
//! `BIKESHARE_*` environment variables and validated before use.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validation::*;
