//! What the display layer shows for one date-range selection

use bikeshare_common::DateRange;
use bikeshare_graphs::{ChartSpec, UsageSummary};
use bikeshare_i18n::Locale;
use std::sync::Arc;

/// A labelled value shown above the charts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    /// Caption
    pub label: String,
    /// Formatted value
    pub value: String,
    /// Secondary line such as a delta or a share
    pub detail: Option<String>,
}

/// A chart as it appears on the page
#[derive(Debug, Clone)]
pub struct RenderedChart {
    /// The chart that was rendered
    pub spec: ChartSpec,
    /// Inline SVG when rendering succeeded
    pub svg: Option<String>,
    /// Localized failure message shown in place of the chart
    pub error: Option<String>,
}

impl RenderedChart {
    /// Whether rendering failed
    pub const fn is_failed(&self) -> bool {
        self.svg.is_none()
    }
}

/// A headed group of charts with optional explanatory notes
#[derive(Debug, Clone)]
pub struct PageSection {
    /// Section heading
    pub heading: String,
    /// Metrics shown before the charts
    pub metrics: Vec<Metric>,
    /// Charts in display order
    pub charts: Vec<RenderedChart>,
    /// Explanatory paragraphs
    pub notes: Vec<String>,
}

/// Texts shared by both views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    /// Page language
    pub locale: Locale,
    /// Page title
    pub title: String,
    /// Caption of the date range
    pub range_label: String,
    /// Selected range, formatted
    pub range_text: String,
}

/// A page with data
#[derive(Debug, Clone)]
pub struct DashboardPage {
    /// Title and range
    pub header: PageHeader,
    /// Range requested by the viewer
    pub requested: DateRange,
    /// Notice shown when the request was narrowed to the dataset bounds
    pub clamped_notice: Option<String>,
    /// Years covered, formatted
    pub years_text: String,
    /// Latest-day total with its change since the earliest day
    pub growth: Option<Metric>,
    /// Heading of the explanatory notes
    pub notes_title: String,
    /// Page sections in order
    pub sections: Vec<PageSection>,
    /// Aggregates the page was built from
    pub summary: Arc<UsageSummary>,
}

impl DashboardPage {
    /// Every chart on the page, in order
    pub fn charts(&self) -> impl Iterator<Item = &RenderedChart> {
        self.sections.iter().flat_map(|section| section.charts.iter())
    }
}

/// The "no data in range" page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Title and range
    pub header: PageHeader,
    /// Range requested by the viewer
    pub requested: DateRange,
    /// Range left after clamping, when any
    pub resolved: Option<DateRange>,
    /// Heading of the message
    pub heading: String,
    /// Explanation
    pub message: String,
}

/// Result of one date-range event
#[derive(Debug, Clone)]
pub enum DashboardView {
    /// Metrics and charts for a non-empty selection
    Ready(Box<DashboardPage>),
    /// No records in the selected range
    Empty(EmptyState),
}

impl DashboardView {
    /// Title and range of either view
    pub fn header(&self) -> &PageHeader {
        match self {
            Self::Ready(page) => &page.header,
            Self::Empty(empty) => &empty.header,
        }
    }

    /// Range requested by the viewer
    pub fn requested(&self) -> DateRange {
        match self {
            Self::Ready(page) => page.requested,
            Self::Empty(empty) => empty.requested,
        }
    }

    /// Aggregates behind the view, absent for the empty state
    pub fn summary(&self) -> Option<&UsageSummary> {
        match self {
            Self::Ready(page) => Some(&page.summary),
            Self::Empty(_) => None,
        }
    }

    /// Number of records shown
    pub fn record_count(&self) -> usize {
        self.summary().map_or(0, |summary| summary.record_count)
    }

    /// Whether this is the empty state
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}
