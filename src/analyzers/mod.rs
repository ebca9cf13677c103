//! Rental aggregation.
//!
//! Pure functions over loaded daily and hourly tables: seasonal totals,
//! RFM ranking, hour-of-day profile, monthly trend and date-range totals.

pub mod hourly;
pub mod monthly;
pub mod range;
pub mod rfm;
pub mod season;
pub mod types;
pub mod utility;
