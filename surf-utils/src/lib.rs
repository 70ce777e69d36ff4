//! Shared utility functions for surf forecast crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    use crate::error::DateError;

    /// ISO "YYYY-MM-DD" form, as accepted by the `--start`/`--end` flags
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Format a NaiveDate as the forecast site's "d-m-Y" tag (no zero padding)
    pub fn to_date_tag(date: &NaiveDate) -> String {
        format!("{}-{}-{}", date.day(), date.month(), date.year())
    }

    /// Parse a "d-m-Y" tag such as "5-12-2019"
    pub fn parse_date_tag(s: &str) -> anyhow::Result<NaiveDate> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        let [day, month, year] = parts.as_slice() else {
            return Err(DateError::Malformed(s.to_string()).into());
        };
        NaiveDate::from_ymd_opt(year.parse()?, month.parse()?, day.parse()?)
            .ok_or_else(|| DateError::NotACalendarDate(s.to_string()).into())
    }

    /// Accept either "YYYY-MM-DD" or "d-m-Y" and return the "d-m-Y" tag
    pub fn normalize_date_tag(s: &str) -> anyhow::Result<String> {
        let date = parse_date(s).or_else(|_| parse_date_tag(s))?;
        Ok(to_date_tag(&date))
    }

}

/// Error types
pub mod error {
    use thiserror::Error;

    /// A `d-m-Y` date tag that could not be turned into a date.
    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum DateError {
        #[error("expected a d-m-Y tag, got {0:?}")]
        Malformed(String),
        #[error("{0:?} is not a calendar date")]
        NotACalendarDate(String),
    }
}
