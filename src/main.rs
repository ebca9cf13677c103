//! CLI entry point for the bike rental dashboard.
//!
//! Loads the daily and hourly rental tables, derives the dashboard views and
//! writes them out as CSV/JSON tables and SVG charts.

use anyhow::{Context, Result};
use bike_rental_dashboard::analyzers::hourly::{peak_hour, rentals_by_hour};
use bike_rental_dashboard::analyzers::monthly::monthly_totals;
use bike_rental_dashboard::analyzers::range::{full_range, total_in_range};
use bike_rental_dashboard::analyzers::rfm::compute_rfm;
use bike_rental_dashboard::analyzers::season::aggregate_seasonal_totals;
use bike_rental_dashboard::analyzers::types::{DailyRecord, DateRange};
use bike_rental_dashboard::{
    charts,
    config::DashboardConfig,
    dashboard::{DashboardOptions, build_dashboard},
    data::{load_daily, load_hourly},
    output::{log_rfm, log_seasons, print_pretty, write_dashboard, write_records},
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bike_rental_dashboard")]
#[command(about = "Bike rental analytics: seasons, RFM, peak hours and monthly trends", long_about = None)]
struct Cli {
    /// Daily rentals CSV (overrides DAY_CSV_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    day_csv: Option<PathBuf>,

    /// Hourly rentals CSV (overrides HOUR_CSV_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    hour_csv: Option<PathBuf>,

    /// Directory for tables and charts (overrides OUTPUT_DIR)
    #[arg(short, long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every view, write all tables, the summary and the charts
    Dashboard {
        /// First day of the selected range (YYYY-MM-DD); defaults to the first day in the data
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of the selected range (YYYY-MM-DD); defaults to the last day in the data
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Apply the range to every view, not only the total-rentals metric
        #[arg(long, default_value_t = false)]
        filter_aggregates: bool,
    },
    /// Seasonal rental totals
    Seasons,
    /// Recency/frequency/monetary ranking per day
    Rfm,
    /// Rentals per hour of day and the peak hour
    PeakHours,
    /// Rentals per calendar month
    Monthly,
    /// Total rentals between two dates (inclusive)
    Total {
        #[arg(long)]
        start: NaiveDate,

        #[arg(long)]
        end: NaiveDate,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bike_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bike_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = DashboardConfig::from_env().with_overrides(cli.day_csv, cli.hour_csv, cli.output_dir);
    info!(
        day_csv = %config.day_csv.display(),
        hour_csv = %config.hour_csv.display(),
        output_dir = %config.output_dir.display(),
        "Configuration resolved"
    );

    match cli.command {
        Commands::Dashboard {
            start,
            end,
            filter_aggregates,
        } => run_dashboard(&config, start, end, filter_aggregates)?,
        Commands::Seasons => {
            let daily = load_daily(&config.day_csv)?;
            let hourly = load_hourly(&config.hour_csv)?;
            let report = aggregate_seasonal_totals(&daily, &hourly)?;

            log_seasons(&report.totals);
            write_table(&config.output_dir, "season_totals.csv", &report.totals)?;
        }
        Commands::Rfm => {
            let daily = load_daily(&config.day_csv)?;
            let records = compute_rfm(&daily).context("RFM analysis failed")?;

            log_rfm(&records);
            write_table(&config.output_dir, "rfm.csv", &records)?;
        }
        Commands::PeakHours => {
            let hourly = load_hourly(&config.hour_csv)?;
            let totals = rentals_by_hour(&hourly);

            for t in &totals {
                info!(hour = t.hour, rentals = t.count, "Hour");
            }
            if let Some(peak) = peak_hour(&totals) {
                info!(hour = peak.hour, rentals = peak.count, "Peak rental hour");
            }
            write_table(&config.output_dir, "hourly_totals.csv", &totals)?;
        }
        Commands::Monthly => {
            let daily = load_daily(&config.day_csv)?;
            let totals = monthly_totals(&daily);

            for m in &totals {
                info!(month = %m.month_end.format("%Y-%m"), rentals = m.count, "Month");
            }
            write_table(&config.output_dir, "monthly_totals.csv", &totals)?;
        }
        Commands::Total { start, end } => {
            let range = DateRange::new(start, end)?;
            let daily = load_daily(&config.day_csv)?;
            let total = total_in_range(&daily, &range);

            info!(start = %range.start, end = %range.end, total, "Total bike rentals");
        }
    }

    Ok(())
}

/// Builds the full dashboard and writes its tables and charts.
#[tracing::instrument(skip(config))]
fn run_dashboard(
    config: &DashboardConfig,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    filter_aggregates: bool,
) -> Result<()> {
    let daily = load_daily(&config.day_csv)?;
    let hourly = load_hourly(&config.hour_csv)?;

    let range = resolve_range(&daily, start, end)?;
    let options = DashboardOptions {
        range,
        filter_aggregates,
    };

    let dashboard = build_dashboard(&daily, &hourly, options)?;

    if let Some(r) = &dashboard.range {
        info!(
            start = %r.start,
            end = %r.end,
            total = dashboard.range_total,
            "Total bike rentals in range"
        );
    }
    log_seasons(&dashboard.seasons.totals);
    print_pretty(&dashboard.seasons.join_loss);

    let tables = write_dashboard(&config.output_dir, &dashboard)?;
    let charts = charts::render_dashboard(&config.output_dir, &dashboard)?;

    info!(
        output_dir = %config.output_dir.display(),
        tables = tables.len(),
        charts = charts.len(),
        "Dashboard complete"
    );
    Ok(())
}

/// Fills a partially specified range from the data's own bounds.
fn resolve_range(
    daily: &[DailyRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Option<DateRange>> {
    if start.is_none() && end.is_none() {
        return Ok(None);
    }
    let bounds = full_range(daily).context("daily table is empty, cannot resolve date range")?;
    let range = DateRange::new(start.unwrap_or(bounds.start), end.unwrap_or(bounds.end))?;
    Ok(Some(range))
}

fn write_table<T: serde::Serialize>(dir: &Path, name: &str, rows: &[T]) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(name);
    write_records(&path, rows)?;
    info!(path = %path.display(), rows = rows.len(), "Table written");
    Ok(())
}
