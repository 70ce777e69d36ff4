//! Scrape configuration: target page, credentials, date range, waits and retries.
//!
//! Every field has a default, so a JSON file only needs the parts that differ:
//!
//! ```json
//! {
//!   "credentials": { "email": "me@example.com", "password": "hunter2" },
//!   "range": { "start": "2019-12-07", "end": "2020-12-01", "stride": 5 }
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::date_range::DateRange;
use crate::error::ScrapeError;
use crate::retry::RetryPolicy;
use crate::selectors::DEFAULT_TARGET_URL;

#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Wait budgets, in seconds, for the bounded readiness polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Page body and date-picker presence
    pub page_secs: u64,
    pub cookie_secs: u64,
    pub picker_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            page_secs: 10,
            cookie_secs: 20,
            picker_secs: 20,
        }
    }
}

impl Timeouts {
    pub fn page(&self) -> Duration {
        Duration::from_secs(self.page_secs)
    }

    pub fn cookie(&self) -> Duration {
        Duration::from_secs(self.cookie_secs)
    }

    pub fn picker(&self) -> Duration {
        Duration::from_secs(self.picker_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Retries {
    /// Hover-and-read of a single chart slot
    pub slot: RetryPolicy,
    /// Clicking the calendar day cell
    pub day: RetryPolicy,
    /// Reading the year from the date-picker
    pub year: RetryPolicy,
}

impl Default for Retries {
    fn default() -> Self {
        Retries {
            slot: RetryPolicy::new(5, 0),
            day: RetryPolicy::new(5, 500),
            year: RetryPolicy::new(5, 0),
        }
    }
}

impl Retries {
    /// No pauses between attempts; used by tests driving a fake browser.
    pub fn immediate() -> Self {
        Retries {
            slot: RetryPolicy::new(5, 0),
            day: RetryPolicy::new(5, 0),
            year: RetryPolicy::new(5, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub target_url: String,
    pub credentials: Credentials,
    pub range: DateRange,
    pub timeouts: Timeouts,
    pub retries: Retries,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        ScrapeConfig {
            target_url: DEFAULT_TARGET_URL.to_string(),
            credentials: Credentials::default(),
            range: DateRange {
                start: NaiveDate::from_ymd_opt(2019, 12, 7).unwrap_or_default(),
                end: NaiveDate::from_ymd_opt(2020, 12, 1).unwrap_or_default(),
                stride: 5,
            },
            timeouts: Timeouts::default(),
            retries: Retries::default(),
        }
    }
}

impl ScrapeConfig {
    /// Parse a JSON config document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ScrapeError> {
        serde_json::from_str(json).map_err(|e| ScrapeError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScrapeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ScrapeError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ScrapeError> {
        if self.target_url.trim().is_empty() {
            return Err(ScrapeError::Config("target_url is empty".into()));
        }
        if self.credentials.email.is_empty() || self.credentials.password.is_empty() {
            return Err(ScrapeError::Config("email and password are required".into()));
        }
        if self.range.stride == 0 {
            return Err(ScrapeError::Config("range stride must be at least 1".into()));
        }
        if self.range.start > self.range.end {
            return Err(ScrapeError::Config(format!(
                "range start {} is after end {}",
                self.range.start, self.range.end
            )));
        }
        let retries = [self.retries.slot, self.retries.day, self.retries.year];
        if retries.iter().any(|r| r.max_attempts == 0) {
            return Err(ScrapeError::Config("retry max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}
