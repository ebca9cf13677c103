//! Typed failures raised by the analyzers.
//!
//! Everything above the analyzers (file handling, chart drawing) works in
//! `anyhow::Result` and wraps these with context.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Input rows that break the dataset contract (bad season code, malformed
    /// date, negative count, duplicate day).
    #[error("data contract violation: {0}")]
    DataContract(String),

    /// Input too small or too uniform to form the requested buckets.
    #[error("degenerate input for {column}: {reason}")]
    DegenerateInput { column: &'static str, reason: String },

    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

impl AnalysisError {
    pub(crate) fn contract(msg: impl Into<String>) -> Self {
        AnalysisError::DataContract(msg.into())
    }

    pub(crate) fn degenerate(column: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::DegenerateInput {
            column,
            reason: reason.into(),
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
