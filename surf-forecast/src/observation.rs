use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScrapeError;

/// Tag written in place of a date when a slot could not be read.
pub const ERROR_DATE_TAG: &str = "error";

/// Number of forecast days shown per visited date.
pub const GRID_DAYS: u8 = 5;

/// Number of intra-day charts per forecast day.
pub const GRID_HOURS: u8 = 8;

/// The date attached to an observation.
///
/// Observed dates render the way the forecast site writes them: day-month-year
/// without zero padding (`5-12-2019`).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum ObservationDate {
    Observed(NaiveDate),
    Error,
}

impl ObservationDate {
    pub fn is_error(&self) -> bool {
        matches!(self, ObservationDate::Error)
    }
}

impl fmt::Display for ObservationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationDate::Observed(date) => {
                write!(f, "{}-{}-{}", date.day(), date.month(), date.year())
            }
            ObservationDate::Error => f.write_str(ERROR_DATE_TAG),
        }
    }
}

/// A single forecast reading taken from a chart tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: ObservationDate,
    /// Hour of day
    pub time: u32,
    /// Wave size in metres
    pub wave_size: f64,
    /// Wave period in seconds
    pub wave_period: f64,
}

impl Observation {
    /// The row recorded for a slot whose reads were exhausted.
    pub fn sentinel() -> Self {
        Observation {
            date: ObservationDate::Error,
            time: 0,
            wave_size: 0.0,
            wave_period: 0.0,
        }
    }

    pub fn is_error(&self) -> bool {
        self.date.is_error()
    }
}

/// One addressable chart position: forecast day column and hour row, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub day: u8,
    pub hour: u8,
}

impl Slot {
    /// All 40 slots, day-major, in the order they are read.
    pub fn grid() -> impl Iterator<Item = Slot> {
        (1..=GRID_DAYS).flat_map(|day| (1..=GRID_HOURS).map(move |hour| Slot { day, hour }))
    }

    /// The last forecast day sits at the edge of the scrollable chart strip.
    pub fn is_boundary_day(&self) -> bool {
        self.day == GRID_DAYS
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {} hour {}", self.day, self.hour)
    }
}

/// Destination for observations, one write at a time.
///
/// Implementations report failures as [`ScrapeError::StoreWriteFailure`]; the
/// caller logs and moves on, so a failed write is lost rather than retried.
pub trait ObservationSink {
    fn record(&mut self, observation: &Observation) -> Result<(), ScrapeError>;
}

impl ObservationSink for Vec<Observation> {
    fn record(&mut self, observation: &Observation) -> Result<(), ScrapeError> {
        self.push(observation.clone());
        Ok(())
    }
}

impl<S: ObservationSink + ?Sized> ObservationSink for &mut S {
    fn record(&mut self, observation: &Observation) -> Result<(), ScrapeError> {
        (**self).record(observation)
    }
}
