use crate::analyzers::types::{DailyRecord, RfmRecord};
use crate::analyzers::utility::quantile_buckets;
use crate::error::{AnalysisError, AnalysisResult};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Number of rank buckets for recency and monetary.
const QUARTILES: usize = 4;

/// Frequency never varies per day, so its rank is a fixed placeholder.
pub const FREQUENCY_QUARTILE: u8 = 1;

/// Monetary rank used when every day rented the same amount.
pub const MONETARY_FALLBACK_QUARTILE: u8 = 1;

#[derive(Default)]
struct DayAggregate {
    recency: i64,
    frequency: u64,
    monetary: u64,
}

/// Computes recency/frequency/monetary figures and quartile ranks per day.
///
/// Recency is measured in whole days back from the latest date in the table.
/// Rows sharing a date are folded together (frequency counts them, monetary
/// sums them). Quartile ranks follow raw value order: bucket 0 holds the
/// smallest recency, i.e. the most recent days.
///
/// # Errors
///
/// Returns [`AnalysisError::DegenerateInput`] when the table is empty or has
/// too few distinct recency or monetary values to form four buckets.
#[tracing::instrument(skip_all, fields(rows = daily.len()))]
pub fn compute_rfm(daily: &[DailyRecord]) -> AnalysisResult<Vec<RfmRecord>> {
    let reference = daily
        .iter()
        .map(|d| d.date)
        .max()
        .ok_or_else(|| AnalysisError::degenerate("recency", "no daily rows"))?;

    let mut by_date: BTreeMap<NaiveDate, DayAggregate> = BTreeMap::new();
    for row in daily {
        let entry = by_date.entry(row.date).or_default();
        entry.recency = (reference - row.date).num_days();
        entry.frequency += 1;
        entry.monetary += row.count;
    }

    let recency: Vec<f64> = by_date.values().map(|a| a.recency as f64).collect();
    let monetary: Vec<f64> = by_date.values().map(|a| a.monetary as f64).collect();

    let recency_ranks = quantile_buckets("recency", &recency, QUARTILES)?;

    let monetary_varies = monetary.windows(2).any(|w| w[0] != w[1]);
    let monetary_ranks = if monetary_varies {
        quantile_buckets("monetary", &monetary, QUARTILES)?
    } else {
        vec![MONETARY_FALLBACK_QUARTILE; monetary.len()]
    };

    let records: Vec<RfmRecord> = by_date
        .into_iter()
        .zip(recency_ranks.into_iter().zip(monetary_ranks))
        .map(|((date, agg), (r, m))| RfmRecord {
            date,
            recency: agg.recency,
            frequency: agg.frequency,
            monetary: agg.monetary,
            recency_quartile: r,
            frequency_quartile: FREQUENCY_QUARTILE,
            monetary_quartile: m,
            rfm_score: format!("{r}{FREQUENCY_QUARTILE}{m}"),
        })
        .collect();

    debug!(days = records.len(), reference = %reference, "RFM computed");
    Ok(records)
}
