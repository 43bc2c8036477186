//! Aggregation of filtered daily records into dashboard statistics
//!
//! Every aggregation is a total, pure function over a possibly-empty slice
//! of records. Each one is also exposed through [`DataAggregator`] so the
//! [`AggregationManager`] can run them uniformly.

use crate::regression::{fit_linear, LinearFit};
use bikeshare_common::{DailyRecord, DateRange, Season, WeatherSituation};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// Casual, registered and total counts summed for one group key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateRow<K> {
    /// Group key
    pub key: K,
    /// Sum of casual riders
    pub casual: u64,
    /// Sum of registered riders
    pub registered: u64,
    /// Sum of all riders
    pub total: u64,
}

impl<K> AggregateRow<K> {
    const fn empty(key: K) -> Self {
        Self {
            key,
            casual: 0,
            registered: 0,
            total: 0,
        }
    }

    fn add(&mut self, record: &DailyRecord) {
        self.casual += u64::from(record.casual);
        self.registered += u64::from(record.registered);
        self.total += u64::from(record.total);
    }
}

/// Scalar usage totals over a selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageTotals {
    /// Sum of casual riders
    pub casual: u64,
    /// Sum of registered riders
    pub registered: u64,
    /// Sum of all riders
    pub total: u64,
}

/// Share of casual and registered riders in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsageShare {
    /// Casual share, 0 to 100
    pub casual_pct: f64,
    /// Registered share, 0 to 100
    pub registered_pct: f64,
}

/// Total usage on the latest day compared with the earliest day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyGrowth {
    /// Earliest date of the selection
    pub first_date: NaiveDate,
    /// Total riders on `first_date`
    pub first_total: u64,
    /// Latest date of the selection
    pub last_date: NaiveDate,
    /// Total riders on `last_date`
    pub last_total: u64,
    /// `last_total - first_total`
    pub delta: i64,
}

/// One record's usage at its normalized temperatures
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperaturePoint {
    /// Normalized temperature
    pub temp: f64,
    /// Normalized feels-like temperature
    pub atemp: f64,
    /// Casual riders
    pub casual: u32,
    /// Registered riders
    pub registered: u32,
}

/// Total usage summed over every day sharing a `(temp, atemp)` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureUsage {
    /// Normalized temperature
    pub temp: f64,
    /// Normalized feels-like temperature
    pub atemp: f64,
    /// Sum of all riders
    pub total: u64,
}

/// Every aggregate computed for one date-range selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    /// Resolved range the records were selected with
    pub range: DateRange,
    /// Number of records selected
    pub record_count: usize,
    /// Distinct years present, ascending
    pub years: Vec<i32>,
    /// Scalar totals
    pub totals: UsageTotals,
    /// Casual versus registered share; absent when nobody rode
    pub share: Option<UsageShare>,
    /// Latest versus earliest day; absent for an empty selection
    pub growth: Option<DailyGrowth>,
    /// Per-day sums, ordered by date
    pub daily: Vec<AggregateRow<NaiveDate>>,
    /// Per-season sums, ordered by season code
    pub by_season: Vec<AggregateRow<Season>>,
    /// Per-weather sums, ordered by weather code
    pub by_weather: Vec<AggregateRow<WeatherSituation>>,
    /// One point per record for the temperature scatter
    pub temperature_points: Vec<TemperaturePoint>,
    /// `(temp, atemp)` groups for the regression charts
    pub temperature_usage: Vec<TemperatureUsage>,
    /// Fit of total usage against `temp`
    pub temp_fit: Option<LinearFit>,
    /// Fit of total usage against `atemp`
    pub atemp_fit: Option<LinearFit>,
}

impl UsageSummary {
    /// Whether the selection contained no records
    pub const fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// Trait for aggregating daily records into one statistic
pub trait DataAggregator {
    /// Aggregated value
    type Output;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Aggregate the records
    fn aggregate(&self, records: &[DailyRecord]) -> Self::Output;
}

fn group_by<K: Ord + Copy>(
    records: &[DailyRecord],
    key: impl Fn(&DailyRecord) -> K,
) -> Vec<AggregateRow<K>> {
    let mut groups: BTreeMap<K, AggregateRow<K>> = BTreeMap::new();
    for record in records {
        let k = key(record);
        groups
            .entry(k)
            .or_insert_with(|| AggregateRow::empty(k))
            .add(record);
    }
    groups.into_values().collect()
}

/// One row per distinct date, ordered by date
pub fn daily_totals(records: &[DailyRecord]) -> Vec<AggregateRow<NaiveDate>> {
    group_by(records, |r| r.date)
}

/// One row per season present, ordered by season code
pub fn group_by_season(records: &[DailyRecord]) -> Vec<AggregateRow<Season>> {
    group_by(records, |r| r.season)
}

/// One row per weather situation present, ordered by code
pub fn group_by_weather(records: &[DailyRecord]) -> Vec<AggregateRow<WeatherSituation>> {
    group_by(records, |r| r.weather)
}

/// Scalar totals, all zero for an empty slice
pub fn usage_totals(records: &[DailyRecord]) -> UsageTotals {
    records.iter().fold(UsageTotals::default(), |acc, r| UsageTotals {
        casual: acc.casual + u64::from(r.casual),
        registered: acc.registered + u64::from(r.registered),
        total: acc.total + u64::from(r.total),
    })
}

/// Percent split of the totals; `None` when the total is zero
pub fn usage_share(totals: &UsageTotals) -> Option<UsageShare> {
    if totals.total == 0 {
        return None;
    }
    let total = totals.total as f64;
    Some(UsageShare {
        casual_pct: totals.casual as f64 * 100.0 / total,
        registered_pct: totals.registered as f64 * 100.0 / total,
    })
}

/// `-0.0` and `0.0` share a group
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Totals grouped by `(temp, atemp)`, ordered by temp then atemp
pub fn temperature_usage(records: &[DailyRecord]) -> Vec<TemperatureUsage> {
    // Keys are finite and non-negative once zero is normalized, so bit order matches numeric order.
    let mut groups: BTreeMap<(u64, u64), TemperatureUsage> = BTreeMap::new();
    for record in records {
        let (temp, atemp) = (normalize_zero(record.temp), normalize_zero(record.atemp));
        groups
            .entry((temp.to_bits(), atemp.to_bits()))
            .or_insert(TemperatureUsage {
                temp,
                atemp,
                total: 0,
            })
            .total += u64::from(record.total);
    }
    groups.into_values().collect()
}

/// Per-record temperature points for the scatter chart
pub fn temperature_points(records: &[DailyRecord]) -> Vec<TemperaturePoint> {
    records
        .iter()
        .map(|r| TemperaturePoint {
            temp: r.temp,
            atemp: r.atemp,
            casual: r.casual,
            registered: r.registered,
        })
        .collect()
}

/// Latest-day total compared with the earliest-day total.
///
/// Looks the days up by date rather than position, so unsorted input is
/// fine. When a date occurs more than once its counts are summed.
pub fn daily_growth(records: &[DailyRecord]) -> Option<DailyGrowth> {
    let daily = daily_totals(records);
    let first = daily.first()?;
    let last = daily.last()?;
    Some(DailyGrowth {
        first_date: first.key,
        first_total: first.total,
        last_date: last.key,
        last_total: last.total,
        delta: i64::try_from(last.total).unwrap_or(i64::MAX)
            - i64::try_from(first.total).unwrap_or(i64::MAX),
    })
}

/// Aggregator for per-day sums
#[derive(Debug, Default, Clone, Copy)]
pub struct DailyTotalsAggregator;

impl DataAggregator for DailyTotalsAggregator {
    type Output = Vec<AggregateRow<NaiveDate>>;

    fn name(&self) -> &'static str {
        "daily_totals"
    }

    fn aggregate(&self, records: &[DailyRecord]) -> Self::Output {
        daily_totals(records)
    }
}

/// Aggregator for per-season sums
#[derive(Debug, Default, Clone, Copy)]
pub struct SeasonAggregator;

impl DataAggregator for SeasonAggregator {
    type Output = Vec<AggregateRow<Season>>;

    fn name(&self) -> &'static str {
        "by_season"
    }

    fn aggregate(&self, records: &[DailyRecord]) -> Self::Output {
        group_by_season(records)
    }
}

/// Aggregator for per-weather sums
#[derive(Debug, Default, Clone, Copy)]
pub struct WeatherAggregator;

impl DataAggregator for WeatherAggregator {
    type Output = Vec<AggregateRow<WeatherSituation>>;

    fn name(&self) -> &'static str {
        "by_weather"
    }

    fn aggregate(&self, records: &[DailyRecord]) -> Self::Output {
        group_by_weather(records)
    }
}

/// Aggregator for scalar totals
#[derive(Debug, Default, Clone, Copy)]
pub struct UsageTotalsAggregator;

impl DataAggregator for UsageTotalsAggregator {
    type Output = UsageTotals;

    fn name(&self) -> &'static str {
        "usage_totals"
    }

    fn aggregate(&self, records: &[DailyRecord]) -> Self::Output {
        usage_totals(records)
    }
}

/// Aggregator for `(temp, atemp)` groups
#[derive(Debug, Default, Clone, Copy)]
pub struct TemperatureAggregator;

impl DataAggregator for TemperatureAggregator {
    type Output = Vec<TemperatureUsage>;

    fn name(&self) -> &'static str {
        "temperature_usage"
    }

    fn aggregate(&self, records: &[DailyRecord]) -> Self::Output {
        temperature_usage(records)
    }
}

/// Aggregator for the earliest and latest day
#[derive(Debug, Default, Clone, Copy)]
pub struct DailyGrowthAggregator;

impl DataAggregator for DailyGrowthAggregator {
    type Output = Option<DailyGrowth>;

    fn name(&self) -> &'static str {
        "daily_growth"
    }

    fn aggregate(&self, records: &[DailyRecord]) -> Self::Output {
        daily_growth(records)
    }
}

/// Runs every aggregator over one selection
#[derive(Debug, Default, Clone, Copy)]
pub struct AggregationManager;

impl AggregationManager {
    /// Create a manager
    pub const fn new() -> Self {
        Self
    }

    fn run<A: DataAggregator>(aggregator: &A, records: &[DailyRecord]) -> A::Output {
        debug!(aggregator = aggregator.name(), "Running aggregator");
        aggregator.aggregate(records)
    }

    /// Compute the full [`UsageSummary`] for records selected with `range`
    #[instrument(skip(self, records), fields(records = records.len(), %range))]
    pub fn summarize(&self, records: &[DailyRecord], range: DateRange) -> UsageSummary {
        let totals = Self::run(&UsageTotalsAggregator, records);
        let temperature_usage = Self::run(&TemperatureAggregator, records);

        let temp_points: Vec<(f64, f64)> = temperature_usage
            .iter()
            .map(|t| (t.temp, t.total as f64))
            .collect();
        let atemp_points: Vec<(f64, f64)> = temperature_usage
            .iter()
            .map(|t| (t.atemp, t.total as f64))
            .collect();

        UsageSummary {
            range,
            record_count: records.len(),
            years: records
                .iter()
                .map(|r| r.year)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            share: usage_share(&totals),
            totals,
            growth: Self::run(&DailyGrowthAggregator, records),
            daily: Self::run(&DailyTotalsAggregator, records),
            by_season: Self::run(&SeasonAggregator, records),
            by_weather: Self::run(&WeatherAggregator, records),
            temperature_points: temperature_points(records),
            temp_fit: fit_linear(&temp_points),
            atemp_fit: fit_linear(&atemp_points),
            temperature_usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_common::test_utils::{date, range, record, RecordBuilder};

    fn two_days() -> Vec<DailyRecord> {
        vec![
            record(date(2011, 1, 1), 50, 200),
            record(date(2011, 1, 2), 30, 100),
        ]
    }

    #[test]
    fn test_single_day_example() {
        let records: Vec<_> = two_days()
            .into_iter()
            .filter(|r| r.date == date(2011, 1, 1))
            .collect();
        let daily = daily_totals(&records);
        assert_eq!(
            daily,
            vec![AggregateRow {
                key: date(2011, 1, 1),
                casual: 50,
                registered: 200,
                total: 250
            }]
        );
        assert_eq!(
            usage_totals(&records),
            UsageTotals {
                casual: 50,
                registered: 200,
                total: 250
            }
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(daily_totals(&[]).is_empty());
        assert!(group_by_season(&[]).is_empty());
        assert_eq!(usage_totals(&[]), UsageTotals::default());
        assert!(usage_share(&UsageTotals::default()).is_none());
        assert!(daily_growth(&[]).is_none());

        let summary = AggregationManager::new().summarize(&[], range(date(2011, 1, 1), date(2011, 1, 2)));
        assert!(summary.is_empty());
        assert!(summary.temp_fit.is_none());
    }

    #[test]
    fn test_growth_uses_dates_not_positions() {
        let mut records = two_days();
        records.reverse();
        let growth = daily_growth(&records).unwrap();
        assert_eq!(growth.first_date, date(2011, 1, 1));
        assert_eq!(growth.last_total, 130);
        assert_eq!(growth.delta, -120);
    }

    #[test]
    fn test_groups_ordered_by_code() {
        let records = vec![
            RecordBuilder::new(date(2011, 7, 1))
                .season(Season::Summer)
                .weather(WeatherSituation::LightPrecipitation)
                .counts(1, 2)
                .build(),
            RecordBuilder::new(date(2011, 1, 1)).counts(3, 4).build(),
            RecordBuilder::new(date(2011, 7, 2))
                .season(Season::Summer)
                .weather(WeatherSituation::Clear)
                .counts(5, 6)
                .build(),
        ];
        let seasons = group_by_season(&records);
        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[0].key, Season::Winter);
        assert_eq!(seasons[1].total, 14);

        let weather = group_by_weather(&records);
        assert_eq!(weather[0].key, WeatherSituation::Clear);
        assert_eq!(weather[0].casual, 8);
        assert_eq!(weather[1].key, WeatherSituation::LightPrecipitation);
    }

    #[test]
    fn test_share_percentages() {
        let share = usage_share(&usage_totals(&two_days())).unwrap();
        assert!((share.casual_pct - 80.0 * 100.0 / 380.0).abs() < 1e-9);
        assert!((share.casual_pct + share.registered_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_groups_sum_totals() {
        let records = vec![
            RecordBuilder::new(date(2011, 1, 1)).temps(0.3, 0.25).counts(1, 1).build(),
            RecordBuilder::new(date(2011, 1, 2)).temps(0.2, 0.2).counts(2, 2).build(),
            RecordBuilder::new(date(2011, 1, 3)).temps(0.3, 0.25).counts(3, 3).build(),
        ];
        let groups = temperature_usage(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].temp, 0.2);
        assert_eq!(groups[1].total, 8);
        assert_eq!(temperature_points(&records).len(), 3);
    }

    #[test]
    fn test_negative_zero_temperature_grouped_with_zero() {
        let records = vec![
            RecordBuilder::new(date(2011, 1, 1)).temps(-0.0, 0.1).counts(1, 1).build(),
            RecordBuilder::new(date(2011, 1, 2)).temps(0.0, 0.1).counts(2, 2).build(),
            RecordBuilder::new(date(2011, 1, 3)).temps(0.1, -0.0).counts(3, 3).build(),
            RecordBuilder::new(date(2011, 1, 4)).temps(0.1, 0.0).counts(4, 4).build(),
        ];
        let groups = temperature_usage(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].total, 6);
        assert!(groups[0].temp.is_sign_positive());
        assert_eq!(groups[1].total, 14);
        assert!(groups[1].atemp.is_sign_positive());
    }

    #[test]
    fn test_summary_fits_lines() {
        let records = vec![
            RecordBuilder::new(date(2011, 1, 1)).temps(0.1, 0.1).counts(10, 90).build(),
            RecordBuilder::new(date(2011, 1, 2)).temps(0.2, 0.2).counts(20, 180).build(),
            RecordBuilder::new(date(2011, 1, 3)).temps(0.3, 0.3).counts(30, 270).build(),
        ];
        let summary = AggregationManager::new().summarize(&records, range(date(2011, 1, 1), date(2011, 1, 3)));
        let fit = summary.temp_fit.unwrap();
        assert!((fit.slope - 1000.0).abs() < 1e-6);
        assert_eq!(summary.years, vec![2011]);
        assert_eq!(summary.growth.unwrap().delta, 200);
    }
}
