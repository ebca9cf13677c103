//! Output formatting and persistence for dashboard tables.
//!
//! Debug logging of tables, JSON summaries and CSV export.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{RfmRecord, SeasonalTotal};
use crate::dashboard::Dashboard;
use csv::WriterBuilder;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Logs the seasonal table, one line per season.
pub fn log_seasons(totals: &[SeasonalTotal]) {
    for t in totals {
        info!(
            season = %t.season,
            daily = t.daily_sum,
            hourly = t.hourly_sum,
            total = t.combined_total,
            "Season"
        );
    }
}

/// Logs the RFM table, one line per day.
pub fn log_rfm(records: &[RfmRecord]) {
    for r in records {
        info!(
            date = %r.date,
            recency = r.recency,
            frequency = r.frequency,
            monetary = r.monetary,
            score = %r.rfm_score,
            "RFM"
        );
    }
}

/// Writes rows to a CSV file with a header line, replacing any existing file.
pub fn write_records<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes a value as pretty-printed JSON.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Writes every table plus `summary.json` into `dir`, returning the files written.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn write_dashboard(dir: &Path, dashboard: &Dashboard) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut written = Vec::new();

    let path = dir.join("season_totals.csv");
    write_records(&path, &dashboard.seasons.totals)?;
    written.push(path);

    let path = dir.join("hourly_totals.csv");
    write_records(&path, &dashboard.hourly)?;
    written.push(path);

    let path = dir.join("monthly_totals.csv");
    write_records(&path, &dashboard.monthly)?;
    written.push(path);

    if let Some(rfm) = &dashboard.rfm {
        let path = dir.join("rfm.csv");
        write_records(&path, rfm)?;
        written.push(path);
    }

    let path = dir.join("summary.json");
    write_json(&path, dashboard)?;
    written.push(path);

    info!(files = written.len(), "Dashboard tables written");
    Ok(written)
}
