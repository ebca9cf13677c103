//! Assembles every dashboard view from the loaded tables.

use crate::analyzers::hourly::{peak_hour, rentals_by_hour};
use crate::analyzers::monthly::monthly_totals;
use crate::analyzers::range::{filter_daily, filter_hourly, full_range, total_in_range};
use crate::analyzers::rfm::compute_rfm;
use crate::analyzers::season::aggregate_seasonal_totals;
use crate::analyzers::types::{
    DailyRecord, DateRange, HourlyRecord, HourlyTotal, MonthlyTotal, RfmRecord, SeasonalReport,
};
use crate::error::{AnalysisError, AnalysisResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{info, warn};

/// How the selected date range is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardOptions {
    /// Range for the total-rentals metric. Defaults to the whole daily table.
    pub range: Option<DateRange>,
    /// Also restrict the hourly, seasonal, RFM and monthly views to `range`.
    pub filter_aggregates: bool,
}

/// Every view shown on the dashboard.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    /// `None` only when the daily table is empty.
    pub range: Option<DateRange>,
    pub range_total: u64,
    pub aggregates_filtered: bool,
    pub peak_hour: Option<HourlyTotal>,
    pub hourly: Vec<HourlyTotal>,
    pub seasons: SeasonalReport,
    pub monthly: Vec<MonthlyTotal>,
    /// `None` when the daily table is too small or uniform to rank.
    #[serde(skip_serializing)]
    pub rfm: Option<Vec<RfmRecord>>,
    pub rfm_days: usize,
}

/// Builds the dashboard views.
///
/// A degenerate RFM input is logged and leaves [`Dashboard::rfm`] empty; any
/// other analysis error is returned.
#[tracing::instrument(skip_all, fields(filter_aggregates = options.filter_aggregates))]
pub fn build_dashboard(
    daily: &[DailyRecord],
    hourly: &[HourlyRecord],
    options: DashboardOptions,
) -> AnalysisResult<Dashboard> {
    let range = options.range.or_else(|| full_range(daily));
    let range_total = range.map_or(0, |r| total_in_range(daily, &r));

    let (daily, hourly): (Cow<[DailyRecord]>, Cow<[HourlyRecord]>) =
        match range.filter(|_| options.filter_aggregates) {
            Some(r) => (
                Cow::Owned(filter_daily(daily, &r)),
                Cow::Owned(filter_hourly(hourly, &r)),
            ),
            None => (Cow::Borrowed(daily), Cow::Borrowed(hourly)),
        };

    let hourly_totals = rentals_by_hour(&hourly);
    let peak = peak_hour(&hourly_totals);
    let seasons = aggregate_seasonal_totals(&daily, &hourly)?;
    let monthly = monthly_totals(&daily);

    let rfm = match compute_rfm(&daily) {
        Ok(records) => Some(records),
        Err(AnalysisError::DegenerateInput { column, reason }) => {
            warn!(column, %reason, "Skipping RFM analysis");
            None
        }
        Err(e) => return Err(e),
    };

    if let Some(p) = peak {
        info!(hour = p.hour, rentals = p.count, "Peak rental hour");
    }
    info!(range_total, seasons = seasons.totals.len(), months = monthly.len(), "Dashboard built");

    Ok(Dashboard {
        schema_version: 1,
        generated_at: Utc::now(),
        range,
        range_total,
        aggregates_filtered: options.filter_aggregates,
        peak_hour: peak,
        hourly: hourly_totals,
        seasons,
        monthly,
        rfm_days: rfm.as_ref().map_or(0, Vec::len),
        rfm,
    })
}
