use crate::analyzers::types::{HourlyRecord, HourlyTotal};
use std::collections::BTreeMap;

/// Sums rentals per hour of day across every date, ordered by hour.
pub fn rentals_by_hour(hourly: &[HourlyRecord]) -> Vec<HourlyTotal> {
    let mut by_hour: BTreeMap<u8, u64> = BTreeMap::new();
    for row in hourly {
        *by_hour.entry(row.hour).or_default() += row.count;
    }

    by_hour
        .into_iter()
        .map(|(hour, count)| HourlyTotal { hour, count })
        .collect()
}

/// Returns the busiest hour. Ties go to the earliest hour.
pub fn peak_hour(totals: &[HourlyTotal]) -> Option<HourlyTotal> {
    totals
        .iter()
        .copied()
        .reduce(|best, t| if t.count > best.count { t } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hour(d: u32, hour: u8, count: u64) -> HourlyRecord {
        HourlyRecord {
            date: NaiveDate::from_ymd_opt(2011, 6, d).unwrap(),
            hour,
            count,
        }
    }

    #[test]
    fn test_rentals_by_hour_sums_across_days() {
        let rows = vec![hour(1, 17, 100), hour(2, 17, 50), hour(1, 8, 90), hour(2, 3, 1)];
        let totals = rentals_by_hour(&rows);

        assert_eq!(
            totals,
            vec![
                HourlyTotal { hour: 3, count: 1 },
                HourlyTotal { hour: 8, count: 90 },
                HourlyTotal { hour: 17, count: 150 },
            ]
        );
    }

    #[test]
    fn test_peak_hour() {
        let rows = vec![hour(1, 17, 100), hour(2, 17, 50), hour(1, 8, 90)];
        let peak = peak_hour(&rentals_by_hour(&rows)).unwrap();
        assert_eq!(peak.hour, 17);
        assert_eq!(peak.count, 150);
    }

    #[test]
    fn test_peak_hour_ties_go_to_earliest() {
        let rows = vec![hour(1, 18, 10), hour(1, 7, 10)];
        assert_eq!(peak_hour(&rentals_by_hour(&rows)).unwrap().hour, 7);
    }

    #[test]
    fn test_peak_hour_empty() {
        assert!(peak_hour(&[]).is_none());
    }
}
