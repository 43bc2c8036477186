//! Domain types for daily bike-sharing usage.

use crate::error::{DashboardError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Meteorological season of a day, coded 1-4 in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// Code 1
    Winter,
    /// Code 2
    Spring,
    /// Code 3
    Summer,
    /// Code 4
    Autumn,
}

impl Season {
    /// All seasons in code order.
    pub const fn all() -> [Self; 4] {
        [Self::Winter, Self::Spring, Self::Summer, Self::Autumn]
    }

    /// Map a dataset code to a season.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Winter),
            2 => Some(Self::Spring),
            3 => Some(Self::Summer),
            4 => Some(Self::Autumn),
            _ => None,
        }
    }

    /// The dataset code of this season.
    pub const fn code(self) -> u8 {
        match self {
            Self::Winter => 1,
            Self::Spring => 2,
            Self::Summer => 3,
            Self::Autumn => 4,
        }
    }

    /// English label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Autumn => "Autumn",
        }
    }

    /// Localization key for the season name.
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::Winter => "season-winter",
            Self::Spring => "season-spring",
            Self::Summer => "season-summer",
            Self::Autumn => "season-autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weather situation of a day, an ordinal severity coded 1-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSituation {
    /// 1: clear, few clouds, partly cloudy
    Clear,
    /// 2: mist and cloudy, broken clouds
    Mist,
    /// 3: light snow, light rain, thunderstorm
    LightPrecipitation,
}

impl WeatherSituation {
    /// All weather situations in code order.
    pub const fn all() -> [Self; 3] {
        [Self::Clear, Self::Mist, Self::LightPrecipitation]
    }

    /// Map a dataset code to a weather situation.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Clear),
            2 => Some(Self::Mist),
            3 => Some(Self::LightPrecipitation),
            _ => None,
        }
    }

    /// The dataset code.
    pub const fn code(self) -> u8 {
        match self {
            Self::Clear => 1,
            Self::Mist => 2,
            Self::LightPrecipitation => 3,
        }
    }

    /// Localization key for the weather description.
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::Clear => "weather-1",
            Self::Mist => "weather-2",
            Self::LightPrecipitation => "weather-3",
        }
    }
}

impl fmt::Display for WeatherSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One calendar day of usage.
///
/// `total` always equals `casual + registered` and `year` always matches
/// `date`; both are derived by [`DailyRecord::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyRecord {
    /// Calendar date
    pub date: NaiveDate,
    /// Year of `date`
    pub year: i32,
    /// Season
    pub season: Season,
    /// Weather situation
    pub weather: WeatherSituation,
    /// Normalized temperature in [0, 1]
    pub temp: f64,
    /// Normalized feels-like temperature in [0, 1]
    pub atemp: f64,
    /// Riders without membership
    pub casual: u32,
    /// Riders with membership
    pub registered: u32,
    /// Casual plus registered
    pub total: u32,
}

impl DailyRecord {
    /// Build a record, deriving `year` and `total`.
    pub fn new(
        date: NaiveDate,
        season: Season,
        weather: WeatherSituation,
        temp: f64,
        atemp: f64,
        casual: u32,
        registered: u32,
    ) -> Self {
        Self {
            date,
            year: date.year(),
            season,
            weather,
            temp,
            atemp,
            casual,
            registered,
            total: casual.saturating_add(registered),
        }
    }
}

/// Inclusive range of calendar dates with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::invalid_range(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day.
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// First day, inclusive.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day, inclusive.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, at least 1.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Overlap of two ranges, `None` when they are disjoint.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Self { start, end })
    }

    /// Whether `other` lies entirely inside this range.
    pub fn covers(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// How a requested range extending past the dataset bounds is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Narrow the range to the dataset bounds
    #[default]
    Clamp,
    /// Fail with [`DashboardError::InvalidRange`]
    Reject,
}

impl std::str::FromStr for RangePolicy {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "reject" => Ok(Self::Reject),
            other => Err(DashboardError::validation_field(
                format!("unknown range policy '{other}'"),
                "data.range_policy",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_season_codes() {
        for season in Season::all() {
            assert_eq!(Season::from_code(season.code()), Some(season));
        }
        assert_eq!(Season::from_code(0), None);
        assert_eq!(Season::from_code(5), None);
        assert_eq!(Season::Winter.label(), "Winter");
        assert_eq!(Season::Autumn.code(), 4);
    }

    #[test]
    fn test_weather_codes() {
        assert_eq!(WeatherSituation::from_code(2), Some(WeatherSituation::Mist));
        assert_eq!(WeatherSituation::from_code(4), None);
        assert_eq!(WeatherSituation::LightPrecipitation.to_string(), "3");
    }

    #[test]
    fn test_record_derives_year_and_total() {
        let record = DailyRecord::new(
            date(2012, 7, 4),
            Season::Summer,
            WeatherSituation::Clear,
            0.7,
            0.65,
            1200,
            4100,
        );
        assert_eq!(record.year, 2012);
        assert_eq!(record.total, 5300);
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = DateRange::new(date(2011, 2, 1), date(2011, 1, 1)).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidRange { .. }));
    }

    #[test]
    fn test_range_operations() {
        let january = DateRange::new(date(2011, 1, 1), date(2011, 1, 31)).unwrap();
        assert_eq!(january.num_days(), 31);
        assert!(january.contains(date(2011, 1, 1)));
        assert!(january.contains(date(2011, 1, 31)));
        assert!(!january.contains(date(2011, 2, 1)));

        let late = DateRange::new(date(2011, 1, 20), date(2011, 2, 10)).unwrap();
        let overlap = january.intersect(&late).unwrap();
        assert_eq!(overlap.start(), date(2011, 1, 20));
        assert_eq!(overlap.end(), date(2011, 1, 31));

        let march = DateRange::single_day(date(2011, 3, 1));
        assert_eq!(march.num_days(), 1);
        assert!(january.intersect(&march).is_none());
        assert!(january.covers(&DateRange::single_day(date(2011, 1, 15))));
        assert!(!january.covers(&late));
        assert_eq!(january.to_string(), "2011-01-01 to 2011-01-31");
    }

    #[test]
    fn test_range_policy_parsing() {
        assert_eq!(RangePolicy::default(), RangePolicy::Clamp);
        assert_eq!(" Reject ".parse::<RangePolicy>().unwrap(), RangePolicy::Reject);
        assert!("ignore".parse::<RangePolicy>().is_err());
    }
}
