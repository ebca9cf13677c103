use crate::analyzers::types::{DailyRecord, DateRange, HourlyRecord};

/// Total daily rentals with `start <= date <= end`.
pub fn total_in_range(daily: &[DailyRecord], range: &DateRange) -> u64 {
    daily
        .iter()
        .filter(|d| range.contains(d.date))
        .map(|d| d.count)
        .sum()
}

/// Returns the daily rows that fall inside `range`.
pub fn filter_daily(daily: &[DailyRecord], range: &DateRange) -> Vec<DailyRecord> {
    daily.iter().filter(|d| range.contains(d.date)).cloned().collect()
}

/// Returns the hourly rows that fall inside `range`.
pub fn filter_hourly(hourly: &[HourlyRecord], range: &DateRange) -> Vec<HourlyRecord> {
    hourly.iter().filter(|h| range.contains(h.date)).cloned().collect()
}

/// Earliest and latest day in the table, or `None` when it is empty.
pub fn full_range(daily: &[DailyRecord]) -> Option<DateRange> {
    let start = daily.iter().map(|d| d.date).min()?;
    let end = daily.iter().map(|d| d.date).max()?;
    Some(DateRange { start, end })
}
