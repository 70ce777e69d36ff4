use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// A half-open range of dates `[start, end)` visited every `stride` days.
///
/// The range is `Copy`; each call to [`DateRange::dates`] starts a fresh walk,
/// so the same range always yields the same sequence.
#[derive(Clone, Eq, PartialEq, Copy, Debug, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub stride: u32,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate, stride: u32) -> Result<Self, ScrapeError> {
        if stride == 0 {
            return Err(ScrapeError::Config("date range stride must be at least 1".into()));
        }
        Ok(DateRange { start, end, stride })
    }

    /// Lazily yields `start + k * stride` while strictly before `end`.
    pub fn dates(&self) -> Dates {
        Dates {
            next: self.start,
            end: self.end,
            stride: TimeDelta::days(i64::from(self.stride.max(1))),
        }
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = Dates;

    fn into_iter(self) -> Self::IntoIter {
        self.dates()
    }
}

/// Iterator produced by [`DateRange::dates`].
#[derive(Clone, Debug)]
pub struct Dates {
    next: NaiveDate,
    end: NaiveDate,
    stride: TimeDelta,
}

impl Iterator for Dates {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.next < self.end {
            let current = self.next;
            // Past chrono's max date there is nothing left to visit
            self.next = current.checked_add_signed(self.stride).unwrap_or(self.end);
            Some(current)
        } else {
            None
        }
    }
}
