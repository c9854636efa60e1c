//! Temporal ranges for GPW census-year datasets.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A closed time range. GPW data is keyed by census year, so every bound
/// falls on January 1st, 00:00 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// From the start of `year` to the start of `year + years`.
    pub fn year_span(year: i32, years: i32) -> Result<Self, TimeParseError> {
        Ok(Self::new(year_start(year)?, year_start(year + years)?))
    }
}

/// Midnight UTC on January 1st of `year`.
pub fn year_start(year: i32) -> Result<DateTime<Utc>, TimeParseError> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or(TimeParseError::InvalidYear(year))
}

/// Parse a four digit year token such as "2015".
pub fn parse_year(token: &str) -> Result<i32, TimeParseError> {
    if token.len() != 4 || !token.chars().all(|c| c.is_ascii_digit()) {
        return Err(TimeParseError::InvalidFormat(token.to_string()));
    }
    token
        .parse()
        .map_err(|_| TimeParseError::InvalidFormat(token.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid year token: {0}")]
    InvalidFormat(String),

    #[error("Year out of range: {0}")]
    InvalidYear(i32),
}
