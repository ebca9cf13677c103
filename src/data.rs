//! CSV loading for the daily (`day.csv`) and hourly (`hour.csv`) rental tables.
//!
//! Only the columns the analyzers need are read; the rest of the dataset
//! (weather, user splits, ...) is ignored. Every row is validated into a
//! typed record, and the first bad row aborts the load with an
//! [`AnalysisError::DataContract`] naming its line.

use crate::analyzers::types::{DailyRecord, HourlyRecord};
use crate::error::{AnalysisError, AnalysisResult};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct DailyRow {
    dteday: String,
    season: i64,
    cnt: i64,
}

#[derive(Debug, Deserialize)]
struct HourlyRow {
    dteday: String,
    hr: i64,
    cnt: i64,
}

fn parse_date(line: usize, raw: &str) -> AnalysisResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
        AnalysisError::contract(format!("line {line}: malformed date '{raw}': {e}"))
    })
}

fn parse_count(line: usize, raw: i64) -> AnalysisResult<u64> {
    u64::try_from(raw)
        .map_err(|_| AnalysisError::contract(format!("line {line}: negative count {raw}")))
}

impl DailyRow {
    fn validate(self, line: usize) -> AnalysisResult<DailyRecord> {
        let season = u8::try_from(self.season).map_err(|_| {
            AnalysisError::contract(format!("line {line}: unknown season code {}", self.season))
        })?;
        Ok(DailyRecord {
            date: parse_date(line, &self.dteday)?,
            season,
            count: parse_count(line, self.cnt)?,
        })
    }
}

impl HourlyRow {
    fn validate(self, line: usize) -> AnalysisResult<HourlyRecord> {
        let hour = u8::try_from(self.hr)
            .ok()
            .filter(|h| *h < 24)
            .ok_or_else(|| {
                AnalysisError::contract(format!("line {line}: hour {} outside 0-23", self.hr))
            })?;
        Ok(HourlyRecord {
            date: parse_date(line, &self.dteday)?,
            hour,
            count: parse_count(line, self.cnt)?,
        })
    }
}

/// Reads daily rows from any CSV source with a header line.
pub fn read_daily<R: Read>(reader: R) -> Result<Vec<DailyRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for (idx, result) in rdr.deserialize().enumerate() {
        let line = idx + 2;
        let raw: DailyRow = result.with_context(|| format!("reading daily CSV line {line}"))?;
        rows.push(raw.validate(line)?);
    }

    Ok(rows)
}

/// Reads hourly rows from any CSV source with a header line.
pub fn read_hourly<R: Read>(reader: R) -> Result<Vec<HourlyRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for (idx, result) in rdr.deserialize().enumerate() {
        let line = idx + 2;
        let raw: HourlyRow = result.with_context(|| format!("reading hourly CSV line {line}"))?;
        rows.push(raw.validate(line)?);
    }

    Ok(rows)
}

/// Loads the daily table from `path`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_daily(path: impl AsRef<Path>) -> Result<Vec<DailyRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let rows = read_daily(file).with_context(|| format!("loading {}", path.display()))?;
    info!(rows = rows.len(), "Daily table loaded");
    Ok(rows)
}

/// Loads the hourly table from `path`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_hourly(path: impl AsRef<Path>) -> Result<Vec<HourlyRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let rows = read_hourly(file).with_context(|| format!("loading {}", path.display()))?;
    info!(rows = rows.len(), "Hourly table loaded");
    Ok(rows)
}
