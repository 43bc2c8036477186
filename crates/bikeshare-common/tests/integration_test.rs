//! Integration tests for bikeshare-common crate.

use bikeshare_common::{
    escape_html, format_percentage, format_signed_thousands, format_thousands, DailyRecord,
    DashboardError, DateRange, RangePolicy, Season, WeatherSituation,
};
use chrono::NaiveDate;
use std::collections::HashMap;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_metric_formatting() {
    assert_eq!(format_thousands(3_292_679), "3,292,679");
    assert_eq!(format_signed_thousands(-1_744), "-1,744");
    assert_eq!(format_percentage(81.17), "81.2%");
    assert_eq!(escape_html("a<b"), "a&lt;b");
}

#[test]
fn test_date_range_as_map_key() {
    let mut map = HashMap::new();
    let r = DateRange::new(date(2011, 1, 1), date(2011, 12, 31)).unwrap();
    map.insert(r, "2011");
    assert_eq!(
        map.get(&DateRange::new(date(2011, 1, 1), date(2011, 12, 31)).unwrap()),
        Some(&"2011")
    );
}

#[test]
fn test_single_day_range_equals_explicit_range() {
    let day = date(2012, 2, 29);
    assert_eq!(DateRange::single_day(day), DateRange::new(day, day).unwrap());
}

#[test]
fn test_reversed_range_is_invalid_range_error() {
    let result = DateRange::new(date(2012, 1, 2), date(2012, 1, 1));
    assert!(matches!(result, Err(DashboardError::InvalidRange { .. })));
}

#[test]
fn test_serialized_shapes() {
    let record = DailyRecord::new(
        date(2011, 1, 1),
        Season::Winter,
        WeatherSituation::Mist,
        0.344167,
        0.363625,
        331,
        654,
    );
    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["date"], "2011-01-01");
    assert_eq!(json["year"], 2011);
    assert_eq!(json["season"], "winter");
    assert_eq!(json["weather"], "mist");
    assert_eq!(json["total"], 985);

    let range = DateRange::new(date(2011, 1, 1), date(2011, 1, 2)).unwrap();
    let json = serde_json::to_value(range).unwrap();
    assert_eq!(json["start"], "2011-01-01");
    assert_eq!(json["end"], "2011-01-02");

    let policy: RangePolicy = serde_yaml::from_str("reject").unwrap();
    assert_eq!(policy, RangePolicy::Reject);
}
