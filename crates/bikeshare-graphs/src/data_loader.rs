//! Loading the daily usage CSV into an immutable [`Dataset`]

use bikeshare_common::{
    DailyRecord, DashboardError, DateRange, Result, Season, WeatherSituation,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Columns that must be present in the header row
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "dteday",
    "season",
    "weathersit",
    "temp",
    "atemp",
    "casual",
    "registered",
    "cnt",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Every day of the input file, in file order, plus its date bounds
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<DailyRecord>,
    bounds: DateRange,
}

impl Dataset {
    /// Build a dataset from records; fails when `records` is empty
    pub fn from_records(records: Vec<DailyRecord>) -> Result<Self> {
        let (Some(min), Some(max)) = (
            records.iter().map(|r| r.date).min(),
            records.iter().map(|r| r.date).max(),
        ) else {
            return Err(DashboardError::load("dataset has no data rows"));
        };
        Ok(Self {
            records,
            bounds: DateRange::new(min, max)?,
        })
    }

    /// All records in file order
    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    /// Earliest and latest date present
    pub const fn bounds(&self) -> DateRange {
        self.bounds
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a loaded dataset
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years covered, ascending
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    season: usize,
    weather: usize,
    temp: usize,
    atemp: usize,
    casual: usize,
    registered: usize,
    total: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| position(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(DashboardError::load(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let find = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            date: find("dteday"),
            season: find("season"),
            weather: find("weathersit"),
            temp: find("temp"),
            atemp: find("atemp"),
            casual: find("casual"),
            registered: find("registered"),
            total: find("cnt"),
        })
    }
}

/// Reads and validates the daily usage CSV
#[derive(Debug, Default, Clone, Copy)]
pub struct DatasetLoader;

impl DatasetLoader {
    /// Create a loader
    pub const fn new() -> Self {
        Self
    }

    /// Load a dataset from a file path
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            DashboardError::load_with_source(
                format!("cannot open dataset {}", path.display()),
                path.display().to_string(),
                e,
            )
        })?;
        self.load_reader(file)
            .map_err(|e| e.at_path(path.display().to_string()))
    }

    /// Load a dataset from any CSV source
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Dataset> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = ColumnIndex::from_headers(csv_reader.headers()?)?;
        debug!(?columns, "Resolved dataset columns");

        let mut records = Vec::new();
        for (i, row) in csv_reader.records().enumerate() {
            records.push(parse_row(&row?, columns, i + 1)?);
        }

        let dataset = Dataset::from_records(records)?;
        info!(
            rows = dataset.len(),
            start = %dataset.bounds().start(),
            end = %dataset.bounds().end(),
            "Loaded bike-sharing dataset"
        );
        Ok(dataset)
    }
}

fn field<'r>(row: &'r csv::StringRecord, index: usize, name: &str, line: usize) -> Result<&'r str> {
    row.get(index)
        .ok_or_else(|| DashboardError::load_at_row(format!("missing value for '{name}'"), line))
}

fn parse_number<T: std::str::FromStr>(
    row: &csv::StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<T> {
    let raw = field(row, index, name, line)?;
    raw.parse().map_err(|_| {
        DashboardError::load_at_row(format!("invalid value '{raw}' for '{name}'"), line)
    })
}

fn parse_unit_interval(
    row: &csv::StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<f64> {
    let value: f64 = parse_number(row, index, name, line)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(DashboardError::load_at_row(
            format!("'{name}' value {value} is outside [0, 1]"),
            line,
        ))
    }
}

fn parse_row(row: &csv::StringRecord, columns: ColumnIndex, line: usize) -> Result<DailyRecord> {
    let raw_date = field(row, columns.date, "dteday", line)?;
    let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|_| {
        DashboardError::load_at_row(format!("unparsable date '{raw_date}'"), line)
    })?;

    let season_code: u8 = parse_number(row, columns.season, "season", line)?;
    let season = Season::from_code(season_code).ok_or_else(|| {
        DashboardError::load_at_row(format!("season code {season_code} is not in 1-4"), line)
    })?;

    let weather_code: u8 = parse_number(row, columns.weather, "weathersit", line)?;
    let weather = WeatherSituation::from_code(weather_code).ok_or_else(|| {
        DashboardError::load_at_row(
            format!("weathersit code {weather_code} is not in 1-3"),
            line,
        )
    })?;

    let temp = parse_unit_interval(row, columns.temp, "temp", line)?;
    let atemp = parse_unit_interval(row, columns.atemp, "atemp", line)?;
    let casual: u32 = parse_number(row, columns.casual, "casual", line)?;
    let registered: u32 = parse_number(row, columns.registered, "registered", line)?;
    let total: u32 = parse_number(row, columns.total, "cnt", line)?;

    if u64::from(total) != u64::from(casual) + u64::from(registered) {
        return Err(DashboardError::load_at_row(
            format!("cnt {total} is not casual {casual} + registered {registered}"),
            line,
        ));
    }

    Ok(DailyRecord::new(
        date, season, weather, temp, atemp, casual, registered,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_common::test_utils::{
        create_temp_dir, date, write_sample_csv, SAMPLE_CSV, SAMPLE_ROWS,
    };

    const HEADER: &str = "dteday,season,weathersit,temp,atemp,casual,registered,cnt\n";

    fn load(csv: &str) -> Result<Dataset> {
        DatasetLoader::new().load_reader(csv.as_bytes())
    }

    fn load_err_row(csv: &str) -> Option<usize> {
        match load(csv) {
            Err(DashboardError::Load { row, .. }) => row,
            other => panic!("expected load error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_sample() {
        let dataset = load(SAMPLE_CSV).unwrap();
        assert_eq!(dataset.len(), SAMPLE_ROWS);
        assert_eq!(dataset.bounds().start(), date(2011, 1, 1));
        assert_eq!(dataset.bounds().end(), date(2012, 12, 31));
        assert_eq!(dataset.years(), vec![2011, 2012]);

        let first = dataset.records()[0];
        assert_eq!(first.season, Season::Winter);
        assert_eq!(first.weather, WeatherSituation::Mist);
        assert_eq!(first.total, 985);
    }

    #[test]
    fn test_load_path_and_missing_file() {
        let dir = create_temp_dir();
        let path = write_sample_csv(dir.path());
        assert_eq!(DatasetLoader::new().load_path(&path).unwrap().len(), SAMPLE_ROWS);

        let err = DatasetLoader::new()
            .load_path(dir.path().join("absent.csv"))
            .unwrap_err();
        assert!(matches!(err, DashboardError::Load { path: Some(_), .. }));
    }

    #[test]
    fn test_all_missing_columns_reported() {
        let err = load("dteday,season,temp,casual\n2011-01-01,1,0.3,5\n").unwrap_err();
        let message = err.to_string();
        for column in ["weathersit", "atemp", "registered", "cnt"] {
            assert!(message.contains(column), "{message} lacks {column}");
        }
        assert!(!message.contains("dteday"));
    }

    #[test]
    fn test_header_only_file_rejected() {
        assert!(matches!(load(HEADER), Err(DashboardError::Load { .. })));
    }

    #[test]
    fn test_bad_values_report_row() {
        let ok = "2011-01-01,1,1,0.3,0.3,10,20,30\n";
        assert_eq!(
            load_err_row(&format!("{HEADER}{ok}2011-02-30,1,1,0.3,0.3,1,2,3\n")),
            Some(2)
        );
        assert_eq!(load_err_row(&format!("{HEADER}2011-01-01,5,1,0.3,0.3,1,2,3\n")), Some(1));
        assert_eq!(load_err_row(&format!("{HEADER}2011-01-01,1,4,0.3,0.3,1,2,3\n")), Some(1));
        assert_eq!(load_err_row(&format!("{HEADER}2011-01-01,1,1,1.3,0.3,1,2,3\n")), Some(1));
        assert_eq!(load_err_row(&format!("{HEADER}{ok}{ok}2011-01-03,1,1,0.3,0.3,1,2,4\n")), Some(3));
        assert_eq!(load_err_row(&format!("{HEADER}2011-01-01,1,1,0.3,0.3,-1,2,1\n")), Some(1));
    }

    #[test]
    fn test_extra_columns_ignored_and_order_free() {
        let csv = "cnt,hum,registered,casual,atemp,temp,weathersit,season,dteday\n\
                   30,0.8,20,10,0.25,0.2,2,3,2011-07-01\n";
        let dataset = load(csv).unwrap();
        let record = dataset.records()[0];
        assert_eq!(record.season, Season::Summer);
        assert_eq!(record.casual, 10);
        assert_eq!(record.registered, 20);
    }
}
