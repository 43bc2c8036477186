//! # Bikeshare Dashboard
//!
//! Interactive dashboard over the daily bike-sharing dataset.
//!
//! A [`Dashboard`] turns each date-range selection into a [`DashboardView`]:
//! localized metrics and charts for the records in range, or an empty state
//! when nothing matches. The [`OutputWriter`] publishes a view as an HTML
//! page with an optional JSON summary and chart files, and a [`Session`]
//! drives selections from line-oriented input.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod dashboard;
pub mod html;
pub mod interaction;
pub mod output;
pub mod view;

pub use dashboard::Dashboard;
pub use html::render_html;
pub use interaction::{parse_command, Command, Session, SessionStats, HELP_TEXT};
pub use output::{summary_json, OutputReport, OutputWriter, PAGE_FILE, SUMMARY_FILE};
pub use view::{DashboardPage, DashboardView, EmptyState, Metric, PageHeader, PageSection, RenderedChart};
