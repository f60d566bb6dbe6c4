//! Time helpers
//!
//! Timestamps are Unix millis everywhere; order dates travel as plain
//! `YYYY-MM-DD` strings and are validated at the edge.

use chrono::NaiveDate;

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
}
