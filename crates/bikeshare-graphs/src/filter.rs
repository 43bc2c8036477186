//! Narrowing the dataset to a date range

use bikeshare_common::{DailyRecord, DashboardError, DateRange, RangePolicy, Result};
use tracing::{debug, instrument};

/// Resolves requested ranges against the dataset bounds and selects records
#[derive(Debug, Clone, Copy)]
pub struct DateFilter {
    bounds: DateRange,
    policy: RangePolicy,
}

impl DateFilter {
    /// Create a filter for a dataset spanning `bounds`
    pub const fn new(bounds: DateRange, policy: RangePolicy) -> Self {
        Self { bounds, policy }
    }

    /// Earliest and latest date of the dataset
    pub const fn bounds(&self) -> DateRange {
        self.bounds
    }

    /// Policy applied to ranges reaching past the bounds
    pub const fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Resolve a requested range into the range that will be filtered.
    ///
    /// Under [`RangePolicy::Clamp`] the range is cut down to the bounds and
    /// `Ok(None)` means no day of the request lies inside the dataset.
    /// Under [`RangePolicy::Reject`] any day outside the bounds is an
    /// [`DashboardError::InvalidRange`].
    pub fn resolve(&self, requested: DateRange) -> Result<Option<DateRange>> {
        match self.policy {
            RangePolicy::Clamp => {
                let resolved = requested.intersect(&self.bounds);
                if resolved != Some(requested) {
                    debug!(%requested, resolved = ?resolved, "Clamped date range to dataset bounds");
                }
                Ok(resolved)
            }
            RangePolicy::Reject => {
                if self.bounds.covers(&requested) {
                    Ok(Some(requested))
                } else {
                    Err(DashboardError::invalid_range(format!(
                        "{requested} is outside the dataset range {}",
                        self.bounds
                    )))
                }
            }
        }
    }

    /// Records whose date lies in `range`, in their original order
    #[instrument(skip(self, records), fields(input = records.len()))]
    pub fn filter_records(&self, records: &[DailyRecord], range: DateRange) -> Vec<DailyRecord> {
        let selected: Vec<DailyRecord> = records
            .iter()
            .filter(|record| range.contains(record.date))
            .copied()
            .collect();
        debug!(selected = selected.len(), "Filtered records");
        selected
    }
}
