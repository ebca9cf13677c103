use bike_rental_dashboard::analyzers::rfm::{MONETARY_FALLBACK_QUARTILE, compute_rfm};
use bike_rental_dashboard::analyzers::season::aggregate_seasonal_totals;
use bike_rental_dashboard::analyzers::types::{DateRange, Season};
use bike_rental_dashboard::charts::render_dashboard;
use bike_rental_dashboard::dashboard::{DashboardOptions, build_dashboard};
use bike_rental_dashboard::data::{load_daily, load_hourly};
use bike_rental_dashboard::error::AnalysisError;
use bike_rental_dashboard::output::write_dashboard;
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Writes a year of synthetic data: one row per day, 24 hourly rows per day
/// whose counts add up to the daily figure.
fn write_year(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let mut day_csv = String::from("instant,dteday,season,yr,mnth,cnt\n");
    let mut hour_csv = String::from("instant,dteday,season,hr,cnt\n");

    let start = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
    let mut hour_instant = 1;
    for i in 0..365u64 {
        let date = start + chrono::Days::new(i);
        let season = (i / 92).min(3) + 1;
        let hourly: Vec<u64> = (0..24u64).map(|h| if h == 17 { 40 } else { (i + h) % 7 }).collect();
        let total: u64 = hourly.iter().sum();

        writeln!(day_csv, "{},{},{},0,1,{}", i + 1, date, season, total).unwrap();
        for (h, cnt) in hourly.iter().enumerate() {
            writeln!(hour_csv, "{},{},{},{},{}", hour_instant, date, season, h, cnt).unwrap();
            hour_instant += 1;
        }
    }

    let day_path = dir.join("day.csv");
    let hour_path = dir.join("hour.csv");
    fs::write(&day_path, day_csv).unwrap();
    fs::write(&hour_path, hour_csv).unwrap();
    (day_path, hour_path)
}

#[test]
fn test_full_pipeline() {
    let dir = tempdir().unwrap();
    let (day_path, hour_path) = write_year(dir.path());

    let daily = load_daily(&day_path).unwrap();
    let hourly = load_hourly(&hour_path).unwrap();
    assert_eq!(daily.len(), 365);
    assert_eq!(hourly.len(), 365 * 24);

    let dashboard = build_dashboard(&daily, &hourly, DashboardOptions::default()).unwrap();

    assert_eq!(dashboard.peak_hour.unwrap().hour, 17);
    assert_eq!(dashboard.monthly.len(), 12);
    assert_eq!(dashboard.rfm_days, 365);
    assert!(dashboard.seasons.join_loss.is_empty());

    // Hourly rows sum to the daily figure, so each season is counted twice.
    for t in &dashboard.seasons.totals {
        assert_eq!(t.daily_sum, t.hourly_sum);
        assert_eq!(t.combined_total, 2 * t.daily_sum);
    }
    let daily_total: u64 = daily.iter().map(|d| d.count).sum();
    assert_eq!(dashboard.range_total, daily_total);

    let out = dir.path().join("out");
    let tables = write_dashboard(&out, &dashboard).unwrap();
    let charts = render_dashboard(&out, &dashboard).unwrap();

    assert_eq!(tables.len(), 5);
    assert_eq!(charts.len(), 4);
    for path in tables.iter().chain(charts.iter()) {
        assert!(path.exists(), "missing {}", path.display());
    }

    let rfm_csv = fs::read_to_string(out.join("rfm.csv")).unwrap();
    assert!(rfm_csv.starts_with("date,recency,frequency,monetary,"));
    assert_eq!(rfm_csv.lines().count(), 366);

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["peak_hour"]["hour"], 17);
    assert_eq!(summary["rfm_days"], 365);
    assert!(summary.get("rfm").is_none());
}

#[test]
fn test_four_season_scenario() {
    let dir = tempdir().unwrap();
    let day_path = dir.path().join("day.csv");
    let hour_path = dir.path().join("hour.csv");
    fs::write(
        &day_path,
        "dteday,season,cnt\n2011-01-01,1,10\n2011-04-01,2,20\n2011-07-01,3,30\n2011-10-01,4,40\n",
    )
    .unwrap();
    fs::write(
        &hour_path,
        "dteday,hr,cnt\n2011-01-01,0,5\n2011-04-01,0,15\n2011-07-01,0,25\n2011-10-01,0,35\n",
    )
    .unwrap();

    let daily = load_daily(&day_path).unwrap();
    let hourly = load_hourly(&hour_path).unwrap();
    let report = aggregate_seasonal_totals(&daily, &hourly).unwrap();

    let got: Vec<(Season, u64)> = report
        .totals
        .iter()
        .map(|t| (t.season, t.combined_total))
        .collect();
    assert_eq!(
        got,
        vec![
            (Season::Winter, 75),
            (Season::Fall, 55),
            (Season::Summer, 35),
            (Season::Spring, 15),
        ]
    );
}

#[test]
fn test_constant_rentals_fall_back_for_monetary() {
    let dir = tempdir().unwrap();
    let day_path = dir.path().join("day.csv");
    fs::write(
        &day_path,
        "dteday,season,cnt\n\
         2011-01-01,1,100\n2011-01-02,1,100\n2011-01-03,1,100\n2011-01-04,1,100\n2011-01-05,1,100\n",
    )
    .unwrap();

    let rfm = compute_rfm(&load_daily(&day_path).unwrap()).unwrap();

    assert_eq!(rfm.len(), 5);
    assert!(rfm.iter().all(|r| r.monetary_quartile == MONETARY_FALLBACK_QUARTILE));
    assert_eq!(rfm.last().unwrap().recency, 0);
}

#[test]
fn test_filtered_dashboard() {
    let dir = tempdir().unwrap();
    let (day_path, hour_path) = write_year(dir.path());
    let daily = load_daily(&day_path).unwrap();
    let hourly = load_hourly(&hour_path).unwrap();

    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2011, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2011, 3, 31).unwrap(),
    )
    .unwrap();
    let options = DashboardOptions {
        range: Some(range),
        filter_aggregates: true,
    };
    let dashboard = build_dashboard(&daily, &hourly, options).unwrap();

    assert_eq!(dashboard.monthly.len(), 1);
    assert_eq!(dashboard.rfm_days, 31);
    assert_eq!(dashboard.seasons.totals.len(), 1);
    assert_eq!(dashboard.seasons.totals[0].season, Season::Spring);
    assert_eq!(dashboard.monthly[0].count, dashboard.range_total);
}

#[test]
fn test_bad_season_code_is_rejected() {
    let dir = tempdir().unwrap();
    let day_path = dir.path().join("day.csv");
    fs::write(&day_path, "dteday,season,cnt\n2011-01-01,5,10\n").unwrap();

    let daily = load_daily(&day_path).unwrap();
    let err = aggregate_seasonal_totals(&daily, &[]).unwrap_err();
    assert!(matches!(err, AnalysisError::DataContract(_)));
}
