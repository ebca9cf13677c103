use crate::analyzers::types::{DailyRecord, MonthlyTotal};
use chrono::{Datelike, Months, NaiveDate};
use std::collections::BTreeMap;

/// Resamples daily rentals into calendar months.
///
/// Every month between the first and last one present is emitted, labelled by
/// its last day; months without rows total 0.
pub fn monthly_totals(daily: &[DailyRecord]) -> Vec<MonthlyTotal> {
    let mut by_month: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for row in daily {
        if let Some(first) = first_of_month(row.date) {
            *by_month.entry(first).or_default() += row.count;
        }
    }

    let (Some(&first), Some(&last)) = (by_month.keys().next(), by_month.keys().next_back()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut month = Some(first);
    while let Some(start) = month.filter(|m| *m <= last) {
        let Some(month_end) = last_of_month(start) else {
            break;
        };
        out.push(MonthlyTotal {
            month_end,
            count: by_month.get(&start).copied().unwrap_or(0),
        });
        month = start.checked_add_months(Months::new(1));
    }
    out
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

fn last_of_month(first: NaiveDate) -> Option<NaiveDate> {
    first.checked_add_months(Months::new(1))?.pred_opt()
}
