/// Error types for the surf forecast scraper
use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for browser-driven scraping operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScrapeError {
    /// A readiness predicate never held within its wait budget
    #[error("Timed out after {waited_ms}ms waiting for {target}")]
    UiWaitTimeout { target: String, waited_ms: u128 },

    /// An expected page field was absent or malformed
    #[error("Failed to read {field}: {reason}")]
    ElementReadFailure { field: String, reason: String },

    /// The calendar day cell could not be selected
    #[error("Day cell for {date} not found after {attempts} attempts")]
    DayCellNotFound { date: NaiveDate, attempts: u32 },

    /// Persisting an observation failed
    #[error("Failed to store observation: {0}")]
    StoreWriteFailure(String),

    /// The browser driver itself faulted
    #[error("Browser error: {0}")]
    Browser(String),

    /// `run` was called before `start` logged in
    #[error("Session is not authenticated")]
    NotAuthenticated,

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ScrapeError {
    pub fn read_failure(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ScrapeError::ElementReadFailure {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Type alias for Results using ScrapeError
pub type Result<T> = std::result::Result<T, ScrapeError>;
