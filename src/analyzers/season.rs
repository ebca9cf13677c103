use crate::analyzers::types::{
    DailyRecord, HourlyRecord, JoinLoss, Season, SeasonalReport, SeasonalTotal,
};
use crate::error::{AnalysisError, AnalysisResult};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Aggregates the daily and hourly tables into per-season rental totals.
///
/// Each season gets the sum of its daily counts plus the sum of its hourly
/// counts (hourly rows are attached to a season through their date). The
/// result is sorted by the combined figure, highest first; ties keep
/// ascending season-code order.
///
/// Hourly dates missing from the daily table, and seasons with no hourly
/// rows, are left out and reported in [`JoinLoss`].
#[tracing::instrument(skip_all, fields(daily_rows = daily.len(), hourly_rows = hourly.len()))]
pub fn aggregate_seasonal_totals(
    daily: &[DailyRecord],
    hourly: &[HourlyRecord],
) -> AnalysisResult<SeasonalReport> {
    let mut daily_by_season: BTreeMap<u8, u64> = BTreeMap::new();
    let mut season_by_date: HashMap<NaiveDate, u8> = HashMap::with_capacity(daily.len());

    for row in daily {
        *daily_by_season.entry(row.season).or_default() += row.count;

        if season_by_date.insert(row.date, row.season).is_some() {
            return Err(AnalysisError::contract(format!(
                "duplicate daily row for {}",
                row.date
            )));
        }
    }

    let mut hourly_by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for row in hourly {
        *hourly_by_date.entry(row.date).or_default() += row.count;
    }

    let mut join_loss = JoinLoss::default();
    let mut hourly_by_season: BTreeMap<u8, u64> = BTreeMap::new();

    for (date, count) in hourly_by_date {
        match season_by_date.get(&date) {
            Some(season) => *hourly_by_season.entry(*season).or_default() += count,
            None => {
                join_loss.unmatched_hourly_dates += 1;
                join_loss.unmatched_hourly_rentals += count;
            }
        }
    }

    let mut totals = Vec::with_capacity(daily_by_season.len());
    for (code, daily_sum) in daily_by_season {
        let season = Season::from_code(code)?;
        let Some(&hourly_sum) = hourly_by_season.get(&code) else {
            join_loss.seasons_without_hourly.push(code);
            continue;
        };

        totals.push(SeasonalTotal {
            season,
            daily_sum,
            hourly_sum,
            combined_total: daily_sum + hourly_sum,
        });
    }

    totals.sort_by(|a, b| b.combined_total.cmp(&a.combined_total));

    if !join_loss.is_empty() {
        warn!(
            unmatched_hourly_dates = join_loss.unmatched_hourly_dates,
            unmatched_hourly_rentals = join_loss.unmatched_hourly_rentals,
            seasons_without_hourly = ?join_loss.seasons_without_hourly,
            "Rows dropped while joining hourly data to seasons"
        );
    }
    debug!(seasons = totals.len(), "Seasonal totals computed");

    Ok(SeasonalReport { totals, join_loss })
}
