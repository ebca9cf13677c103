//! Data types used by the analysis pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AnalysisError, AnalysisResult};

/// One row of the daily rentals table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Raw season code as found in the dataset; validated by the aggregator.
    pub season: u8,
    pub count: u64,
}

/// One row of the hourly rentals table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    pub hour: u8,
    pub count: u64,
}

/// Calendar season derived from the dataset's 1-4 season code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn from_code(code: u8) -> AnalysisResult<Self> {
        match code {
            1 => Ok(Season::Spring),
            2 => Ok(Season::Summer),
            3 => Ok(Season::Fall),
            4 => Ok(Season::Winter),
            other => Err(AnalysisError::contract(format!(
                "unknown season code {other} (expected 1-4)"
            ))),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Fall => 3,
            Season::Winter => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-season rental totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonalTotal {
    pub season: Season,
    pub daily_sum: u64,
    pub hourly_sum: u64,
    /// `daily_sum + hourly_sum`. Both halves measure the same rentals, so this
    /// counts every rental twice. Kept as-is to match the published dashboard
    /// figures; halve it for a true total.
    pub combined_total: u64,
}

/// Rows excluded by the two seasonal joins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinLoss {
    /// Hourly dates with no matching day in the daily table.
    pub unmatched_hourly_dates: usize,
    /// Rentals carried by those unmatched hourly dates.
    pub unmatched_hourly_rentals: u64,
    /// Season codes with a daily sum but no hourly sum.
    pub seasons_without_hourly: Vec<u8>,
}

impl JoinLoss {
    pub fn is_empty(&self) -> bool {
        self.unmatched_hourly_dates == 0 && self.seasons_without_hourly.is_empty()
    }
}

/// Output of the seasonal aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonalReport {
    pub totals: Vec<SeasonalTotal>,
    pub join_loss: JoinLoss,
}

/// Recency/frequency/monetary figures and ranks for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RfmRecord {
    pub date: NaiveDate,
    pub recency: i64,
    pub frequency: u64,
    pub monetary: u64,
    pub recency_quartile: u8,
    pub frequency_quartile: u8,
    pub monetary_quartile: u8,
    pub rfm_score: String,
}

/// Total rentals for one hour of the day, across all dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyTotal {
    pub hour: u8,
    pub count: u64,
}

/// Total rentals for one calendar month, labelled by its last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month_end: NaiveDate,
    pub count: u64,
}

/// Inclusive calendar range used by the date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AnalysisResult<Self> {
        if start > end {
            return Err(AnalysisError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_season_codes() {
        for code in 1..=4 {
            assert_eq!(Season::from_code(code).unwrap().code(), code);
        }
        assert_eq!(Season::from_code(4).unwrap().label(), "winter");
        assert!(matches!(
            Season::from_code(0),
            Err(AnalysisError::DataContract(_))
        ));
        assert!(Season::from_code(5).is_err());
    }

    #[test]
    fn test_season_serializes_lowercase() {
        let json = serde_json::to_string(&Season::Fall).unwrap();
        assert_eq!(json, "\"fall\"");
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(date(2011, 1, 1), date(2011, 1, 31)).unwrap();
        assert!(range.contains(date(2011, 1, 1)));
        assert!(range.contains(date(2011, 1, 31)));
        assert!(!range.contains(date(2011, 2, 1)));
    }

    #[test]
    fn test_date_range_rejects_reversed_bounds() {
        let err = DateRange::new(date(2011, 2, 1), date(2011, 1, 1)).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRange { .. }));
    }
}
