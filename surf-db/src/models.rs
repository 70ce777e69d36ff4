//! Row structs returned by the store's queries.

use serde::Serialize;
use surf_forecast::observation::{Observation, ERROR_DATE_TAG};

/// One stored observation, as it sits in the `results` table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ObservationRow {
    /// `d-m-Y` tag, or `error` for a slot that could not be read.
    pub date: String,
    /// Hour of day.
    pub time: i64,
    /// Wave size in metres.
    pub size: f64,
    /// Wave period in seconds.
    pub period: f64,
}

impl ObservationRow {
    pub fn is_error(&self) -> bool {
        self.date == ERROR_DATE_TAG
    }
}

impl From<&Observation> for ObservationRow {
    fn from(observation: &Observation) -> Self {
        ObservationRow {
            date: observation.date.to_string(),
            time: i64::from(observation.time),
            size: observation.wave_size,
            period: observation.wave_period,
        }
    }
}
