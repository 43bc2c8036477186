//! End-to-end tests for loading, filtering and aggregating the daily dataset.

use bikeshare_common::test_utils::{
    create_temp_dir, date, init_test_logging, range, write_file, write_sample_csv, SAMPLE_CSV,
    SAMPLE_TOTAL, SAMPLE_TOTAL_CASUAL, SAMPLE_TOTAL_REGISTERED,
};
use bikeshare_common::{DashboardError, RangePolicy, Season, WeatherSituation};
use bikeshare_config::CacheConfig;
use bikeshare_graphs::{
    AggregationManager, CachedAggregationManager, DatasetLoader, DateFilter,
};

#[test]
fn test_full_range_summary_matches_sample_totals() {
    init_test_logging();
    let dataset = DatasetLoader::new().load_reader(SAMPLE_CSV.as_bytes()).unwrap();
    let filter = DateFilter::new(dataset.bounds(), RangePolicy::Clamp);
    let resolved = filter.resolve(dataset.bounds()).unwrap().unwrap();
    let records = filter.filter_records(dataset.records(), resolved);
    assert_eq!(records.len(), dataset.len());

    let summary = AggregationManager::new().summarize(&records, resolved);
    assert_eq!(summary.totals.casual, SAMPLE_TOTAL_CASUAL);
    assert_eq!(summary.totals.registered, SAMPLE_TOTAL_REGISTERED);
    assert_eq!(summary.totals.total, SAMPLE_TOTAL);
    assert_eq!(summary.years, vec![2011, 2012]);

    let winter = summary
        .by_season
        .iter()
        .find(|row| row.key == Season::Winter)
        .unwrap();
    assert_eq!((winter.casual, winter.registered), (1515, 11586));

    let clear = summary
        .by_weather
        .iter()
        .find(|row| row.key == WeatherSituation::Clear)
        .unwrap();
    assert_eq!(clear.casual, 1398);

    let growth = summary.growth.unwrap();
    assert_eq!(growth.first_date, date(2011, 1, 1));
    assert_eq!(growth.last_date, date(2012, 12, 31));
    assert_eq!(growth.delta, 2729 - 985);
}

#[test]
fn test_january_selection() {
    let dir = create_temp_dir();
    let dataset = DatasetLoader::new()
        .load_path(write_sample_csv(dir.path()))
        .unwrap();
    let filter = DateFilter::new(dataset.bounds(), RangePolicy::Clamp);
    let january = range(date(2011, 1, 1), date(2011, 1, 31));
    let records = filter.filter_records(dataset.records(), filter.resolve(january).unwrap().unwrap());

    let summary = AggregationManager::new().summarize(&records, january);
    assert_eq!(summary.record_count, 8);
    assert_eq!(summary.daily.len(), 8);
    assert_eq!(summary.by_season.len(), 1);
    assert_eq!(summary.totals.casual, 1076);
    assert_eq!(summary.totals.registered, 9296);
    assert!(summary.temp_fit.is_some());
}

#[test]
fn test_clamp_and_reject_policies() {
    let dataset = DatasetLoader::new().load_reader(SAMPLE_CSV.as_bytes()).unwrap();
    let wide = range(date(2010, 1, 1), date(2013, 1, 1));

    let clamp = DateFilter::new(dataset.bounds(), RangePolicy::Clamp);
    assert_eq!(clamp.resolve(wide).unwrap(), Some(dataset.bounds()));
    assert_eq!(clamp.resolve(range(date(2014, 1, 1), date(2014, 2, 1))).unwrap(), None);

    let reject = DateFilter::new(dataset.bounds(), RangePolicy::Reject);
    assert!(matches!(reject.resolve(wide), Err(DashboardError::InvalidRange { .. })));
}

#[test]
fn test_gap_in_dates_gives_empty_summary() {
    let dataset = DatasetLoader::new().load_reader(SAMPLE_CSV.as_bytes()).unwrap();
    let filter = DateFilter::new(dataset.bounds(), RangePolicy::Clamp);
    let gap = range(date(2011, 2, 1), date(2011, 3, 1));
    let resolved = filter.resolve(gap).unwrap().unwrap();
    let records = filter.filter_records(dataset.records(), resolved);
    assert!(records.is_empty());

    let summary = AggregationManager::new().summarize(&records, resolved);
    assert!(summary.is_empty());
    assert!(summary.growth.is_none());
    assert!(summary.share.is_none());
}

#[test]
fn test_cached_path_matches_uncached() {
    let dataset = DatasetLoader::new().load_reader(SAMPLE_CSV.as_bytes()).unwrap();
    let filter = DateFilter::new(dataset.bounds(), RangePolicy::Clamp);
    let selected = range(date(2011, 1, 3), date(2011, 7, 4));
    let cached = CachedAggregationManager::new(&CacheConfig {
        enabled: true,
        max_capacity: 4,
    });

    let first = cached.summarize(selected, || filter.filter_records(dataset.records(), selected));
    let second = cached.summarize(selected, || filter.filter_records(dataset.records(), selected));
    let direct = AggregationManager::new()
        .summarize(&filter.filter_records(dataset.records(), selected), selected);

    assert_eq!(*first, direct);
    assert_eq!(*second, direct);
    assert_eq!(cached.stats().hits, 1);
}

#[test]
fn test_summary_serializes() {
    let dataset = DatasetLoader::new().load_reader(SAMPLE_CSV.as_bytes()).unwrap();
    let summary = AggregationManager::new().summarize(dataset.records(), dataset.bounds());
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["totals"]["total"], SAMPLE_TOTAL);
    assert_eq!(json["by_season"][0]["key"], "winter");
    assert_eq!(json["daily"][0]["key"], "2011-01-01");
}

#[test]
fn test_loader_error_carries_path() {
    let dir = create_temp_dir();
    let path = write_file(
        dir.path(),
        "bad.csv",
        "dteday,season,weathersit,temp,atemp,casual,registered,cnt\n2011-01-01,1,1,0.3,0.3,1,2,4\n",
    );
    match DatasetLoader::new().load_path(&path) {
        Err(DashboardError::Load { path: Some(p), row, .. }) => {
            assert!(p.ends_with("bad.csv"));
            assert_eq!(row, Some(1));
        }
        other => panic!("expected load error, got {other:?}"),
    }
}
