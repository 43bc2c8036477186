//! # Bikeshare Graphs
//!
//! The data pipeline behind the dashboard: loading the daily usage CSV,
//! narrowing it to a date range, aggregating usage and rendering charts
//! with plotters.
//!
//! Loading happens once; [`DateFilter`], [`AggregationManager`] and
//! [`PlottersRenderer`] run for every date-range selection.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod aggregator;
pub mod cached_aggregator;
pub mod charts;
pub mod data_loader;
pub mod filter;
pub mod regression;
pub mod renderer;
pub mod types;

pub use aggregator::*;
pub use cached_aggregator::*;
pub use charts::*;
pub use data_loader::*;
pub use filter::*;
pub use regression::*;
pub use renderer::*;
pub use types::*;
