//! Test utilities and shared fixtures for the dashboard workspace.
//!
//! Available to this crate's unit tests and, through the `testing` feature,
//! to the integration tests of every other crate in the workspace.

use crate::types::{DailyRecord, DateRange, Season, WeatherSituation};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Twelve days in the layout of the UCI `day.csv` file, including columns
/// the loader ignores.
pub const SAMPLE_CSV: &str = "\
instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,6,0,2,0.344167,0.363625,0.805833,0.160446,331,654,985
2,2011-01-02,1,0,1,0,0,0,2,0.363478,0.353739,0.696087,0.248539,131,670,801
3,2011-01-03,1,0,1,0,1,1,1,0.196364,0.189405,0.437273,0.248309,120,1229,1349
4,2011-01-04,1,0,1,0,2,1,1,0.2,0.212122,0.590435,0.160296,108,1454,1562
5,2011-01-05,1,0,1,0,3,1,1,0.226957,0.22927,0.436957,0.1869,82,1518,1600
6,2011-01-06,1,0,1,0,4,1,1,0.204348,0.233209,0.518261,0.0895652,88,1518,1606
7,2011-01-07,1,0,1,0,5,1,2,0.196522,0.208839,0.498696,0.168726,148,1362,1510
8,2011-01-08,1,0,1,0,6,0,2,0.165,0.162254,0.535833,0.266804,68,891,959
105,2011-04-15,2,0,4,1,5,0,1,0.5,0.486733,0.6,0.2,1000,2500,3500
185,2011-07-04,3,0,7,1,1,0,2,0.726667,0.665417,0.637917,0.081479,3065,2978,6043
302,2011-10-29,4,0,10,0,6,0,3,0.254167,0.227913,0.8825,0.351371,57,570,627
731,2012-12-31,1,1,12,0,1,1,2,0.2155,0.2233,0.5775,0.154846,439,2290,2729
";

/// Number of data rows in [`SAMPLE_CSV`].
pub const SAMPLE_ROWS: usize = 12;
/// Sum of `casual` over [`SAMPLE_CSV`].
pub const SAMPLE_TOTAL_CASUAL: u64 = 5637;
/// Sum of `registered` over [`SAMPLE_CSV`].
pub const SAMPLE_TOTAL_REGISTERED: u64 = 17634;
/// Sum of `cnt` over [`SAMPLE_CSV`].
pub const SAMPLE_TOTAL: u64 = 23271;

/// Shorthand for a calendar date; panics on an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Shorthand for a date range; panics when reversed.
pub fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end).expect("ordered test range")
}

/// Builder for [`DailyRecord`] fixtures with neutral defaults.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    date: NaiveDate,
    season: Season,
    weather: WeatherSituation,
    temp: f64,
    atemp: f64,
    casual: u32,
    registered: u32,
}

impl RecordBuilder {
    /// Start a record for `date` with zero counts.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            season: Season::Winter,
            weather: WeatherSituation::Clear,
            temp: 0.3,
            atemp: 0.3,
            casual: 0,
            registered: 0,
        }
    }

    /// Set the season.
    #[must_use]
    pub const fn season(mut self, season: Season) -> Self {
        self.season = season;
        self
    }

    /// Set the weather situation.
    #[must_use]
    pub const fn weather(mut self, weather: WeatherSituation) -> Self {
        self.weather = weather;
        self
    }

    /// Set both normalized temperatures.
    #[must_use]
    pub const fn temps(mut self, temp: f64, atemp: f64) -> Self {
        self.temp = temp;
        self.atemp = atemp;
        self
    }

    /// Set the rider counts.
    #[must_use]
    pub const fn counts(mut self, casual: u32, registered: u32) -> Self {
        self.casual = casual;
        self.registered = registered;
        self
    }

    /// Build the record.
    pub fn build(self) -> DailyRecord {
        DailyRecord::new(
            self.date,
            self.season,
            self.weather,
            self.temp,
            self.atemp,
            self.casual,
            self.registered,
        )
    }
}

/// A record with default season, weather and temperatures.
pub fn record(date: NaiveDate, casual: u32, registered: u32) -> DailyRecord {
    RecordBuilder::new(date).counts(casual, registered).build()
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `contents` to `name` inside `dir` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Write [`SAMPLE_CSV`] as `day.csv` inside `dir`.
pub fn write_sample_csv(dir: &Path) -> PathBuf {
    write_file(dir, "day.csv", SAMPLE_CSV)
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Property-based testing strategies.
pub mod strategies {
    use super::*;
    use proptest::prelude::*;

    /// A day within 2011-2012, the span of the public dataset.
    pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..731).prop_map(|offset| date(2011, 1, 1) + chrono::Duration::days(offset))
    }

    /// An ordered range within 2011-2012.
    pub fn arb_range() -> impl Strategy<Value = DateRange> {
        (arb_date(), arb_date()).prop_map(|(a, b)| range(a.min(b), a.max(b)))
    }

    /// Any season.
    pub fn arb_season() -> impl Strategy<Value = Season> {
        (1u8..=4).prop_map(|code| Season::from_code(code).expect("code in range"))
    }

    /// Any weather situation.
    pub fn arb_weather() -> impl Strategy<Value = WeatherSituation> {
        (1u8..=3).prop_map(|code| WeatherSituation::from_code(code).expect("code in range"))
    }

    /// A valid daily record.
    pub fn arb_record() -> impl Strategy<Value = DailyRecord> {
        (
            arb_date(),
            arb_season(),
            arb_weather(),
            0.0f64..=1.0,
            0.0f64..=1.0,
            0u32..4000,
            0u32..7000,
        )
            .prop_map(|(date, season, weather, temp, atemp, casual, registered)| {
                DailyRecord::new(date, season, weather, temp, atemp, casual, registered)
            })
    }

    /// Up to `max` records in arbitrary date order, duplicates allowed.
    pub fn arb_records(max: usize) -> impl Strategy<Value = Vec<DailyRecord>> {
        proptest::collection::vec(arb_record(), 0..max)
    }
}
