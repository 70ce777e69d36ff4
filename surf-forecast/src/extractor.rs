//! Reads the 5 × 8 grid of forecast charts for the date on screen.
//!
//! Each chart only reveals its numbers in a tooltip while hovered, so every
//! slot is hover-then-read, retried on its own. A slot that never reads cleanly
//! is recorded as a sentinel row and the grid walk carries on.

use chrono::NaiveDate;
use log::{error, warn};
use regex::Regex;
use std::sync::LazyLock;

use crate::browser::Browser;
use crate::config::Retries;
use crate::error::{Result, ScrapeError};
use crate::observation::{Observation, ObservationDate, ObservationSink, Slot};
use crate::retry::retry;
use crate::selectors;

static HOUR_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+:").unwrap());

/// The year and month the dashboard is showing, used to date tooltip readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewContext {
    pub year: i32,
    /// Calendar month of the visited date, when known
    pub month: Option<u32>,
}

impl ViewContext {
    /// Date a tooltip's `day/month` reading.
    ///
    /// The five-day window can run past December; a tooltip month earlier than
    /// the visited month belongs to the following year.
    pub fn date_of(&self, day: u32, month: u32) -> Option<NaiveDate> {
        let year = match self.month {
            Some(visited) if month < visited => self.year + 1,
            _ => self.year,
        };
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Counts for one pass over the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Readings stored
    pub recorded: u32,
    /// Slots that exhausted their attempts
    pub error_slots: u32,
    /// Writes the sink rejected
    pub lost_writes: u32,
}

impl ExtractionSummary {
    pub fn merge(&mut self, other: ExtractionSummary) {
        self.recorded += other.recorded;
        self.error_slots += other.error_slots;
        self.lost_writes += other.lost_writes;
    }
}

/// Parse the tooltip's `day/month` text.
pub fn parse_day_month(raw: &str) -> Result<(u32, u32)> {
    let (day, month) = raw
        .trim()
        .split_once('/')
        .ok_or_else(|| ScrapeError::read_failure("date", format!("expected day/month, got {raw:?}")))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|e| ScrapeError::read_failure("date", format!("{raw:?}: {e}")))
    };
    Ok((parse(day)?, parse(month)?))
}

/// The hour is the leading number of the first `NN:` in the text.
pub fn parse_hour(raw: &str) -> Result<u32> {
    let found = HOUR_PATTERN
        .find(raw)
        .ok_or_else(|| ScrapeError::read_failure("hour", format!("no hour in {raw:?}")))?;
    found
        .as_str()
        .trim_end_matches(':')
        .parse()
        .map_err(|e| ScrapeError::read_failure("hour", format!("{raw:?}: {e}")))
}

/// Parse a reading such as `1.8m` or `9,2 s`, dropping the unit suffix.
pub fn parse_reading(raw: &str, field: &str) -> Result<f64> {
    let number = raw
        .trim()
        .trim_end_matches(|c: char| c.is_alphabetic() || c.is_whitespace())
        .replace(',', ".");
    number
        .parse()
        .map_err(|e| ScrapeError::read_failure(field, format!("{raw:?}: {e}")))
}

pub struct Extractor<'a, B> {
    browser: &'a B,
    retries: &'a Retries,
}

impl<'a, B: Browser> Extractor<'a, B> {
    pub fn new(browser: &'a B, retries: &'a Retries) -> Self {
        Extractor { browser, retries }
    }

    /// Read and record every slot of the current view.
    pub async fn extract_for_current_view<S: ObservationSink>(
        &self,
        view: ViewContext,
        sink: &mut S,
    ) -> ExtractionSummary {
        let mut summary = ExtractionSummary::default();
        for slot in Slot::grid() {
            let observation = match retry(&self.retries.slot, |_| self.read_slot(slot, view)).await {
                Ok(observation) => observation,
                Err(exhausted) => {
                    warn!(
                        "Giving up on {} after {} attempts: {}",
                        slot, exhausted.attempts, exhausted.last_error
                    );
                    summary.error_slots += 1;
                    Observation::sentinel()
                }
            };
            match sink.record(&observation) {
                Ok(()) if !observation.is_error() => summary.recorded += 1,
                Ok(()) => {}
                Err(e) => {
                    error!(
                        "Problem while saving info for {} at {}h: {}",
                        observation.date, observation.time, e
                    );
                    summary.lost_writes += 1;
                }
            }
        }
        summary
    }

    /// Hover one chart and read its tooltip.
    pub async fn read_slot(&self, slot: Slot, view: ViewContext) -> Result<Observation> {
        let marker = selectors::chart_marker(slot);
        if slot.is_boundary_day() {
            self.browser
                .adjust(&marker, selectors::BOUNDARY_SCROLL_FIX)
                .await?;
        }
        self.browser.hover(&marker).await?;

        let (day, month) = parse_day_month(&self.browser.text(&selectors::tooltip_date()).await?)?;
        let time = parse_hour(&self.browser.text(&selectors::tooltip_hour()).await?)?;
        let wave_size = parse_reading(
            &self.browser.text(&selectors::tooltip_wave_size()).await?,
            "wave size",
        )?;
        let wave_period = parse_reading(
            &self.browser.text(&selectors::tooltip_wave_period()).await?,
            "wave period",
        )?;

        let date = view.date_of(day, month).ok_or_else(|| {
            ScrapeError::read_failure("date", format!("{day}/{month} is not a date in {}", view.year))
        })?;
        Ok(Observation {
            date: ObservationDate::Observed(date),
            time,
            wave_size,
            wave_period,
        })
    }
}
