//! Drives the dashboard's date-picker to a target date.
//!
//! The picker keeps its year and month selects between visits, so only the
//! components that changed since the last successful selection are touched.
//! The day cell is always clicked, then the "view" button applies the choice.

use chrono::{Datelike, NaiveDate};
use log::{debug, warn};

use crate::browser::{Browser, WaitCondition};
use crate::config::{Retries, Timeouts};
use crate::error::{Result, ScrapeError};
use crate::retry::retry;
use crate::selectors;

/// The year and month the remote picker last had selected.
///
/// Owned by the session for one run and threaded into [`Navigator::select`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub current_year: Option<String>,
    pub current_month: Option<String>,
}

/// What [`Navigator::select`] has to change to reach a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPlan {
    /// Year option value, if the year changed
    pub year: Option<String>,
    /// Zero-based month option value, if the month changed
    pub month: Option<String>,
    pub day: u32,
}

impl NavigationState {
    pub fn plan(&self, date: NaiveDate) -> SelectionPlan {
        let year = date.year().to_string();
        let month = picker_month_index(date);
        SelectionPlan {
            year: (self.current_year.as_deref() != Some(year.as_str())).then_some(year),
            month: (self.current_month.as_deref() != Some(month.as_str())).then_some(month),
            day: date.day(),
        }
    }

    /// The year the picker is known to show, as a number.
    pub fn year(&self) -> Option<i32> {
        self.current_year.as_deref().and_then(|y| y.parse().ok())
    }

    /// The one-based calendar month the picker is known to show.
    pub fn month(&self) -> Option<u32> {
        self.current_month
            .as_deref()
            .and_then(|m| m.parse::<u32>().ok())
            .map(|m| m + 1)
    }

    /// Forget the picker position so the next selection sets year and month again.
    pub fn forget(&mut self) {
        self.current_year = None;
        self.current_month = None;
    }
}

/// The picker numbers months from zero: January is `"0"`, December `"11"`.
pub fn picker_month_index(date: NaiveDate) -> String {
    date.month0().to_string()
}

pub struct Navigator<'a, B> {
    browser: &'a B,
    timeouts: &'a Timeouts,
    retries: &'a Retries,
}

impl<'a, B: Browser> Navigator<'a, B> {
    pub fn new(browser: &'a B, timeouts: &'a Timeouts, retries: &'a Retries) -> Self {
        Navigator {
            browser,
            timeouts,
            retries,
        }
    }

    /// Wait for the picker input to become clickable, then open it.
    pub async fn open_picker(&self) -> Result<()> {
        let picker = selectors::date_picker();
        self.browser
            .wait_for(&picker, WaitCondition::Clickable, self.timeouts.picker())
            .await?;
        self.browser.click(&picker).await
    }

    /// Bring the dashboard to `date`, updating `state` as selects change.
    ///
    /// Fails with [`ScrapeError::DayCellNotFound`] when the day link and view
    /// button never both take a click; year and month already applied stay
    /// recorded.
    pub async fn select(&self, date: NaiveDate, state: &mut NavigationState) -> Result<()> {
        self.open_picker().await?;

        let plan = state.plan(date);
        if let Some(year) = plan.year {
            debug!("Selecting year {}", year);
            self.browser
                .select_option(&selectors::year_select(), &year)
                .await?;
            state.current_year = Some(year);
        }
        if let Some(month) = plan.month {
            debug!("Selecting month index {}", month);
            self.browser
                .select_option(&selectors::month_select(), &month)
                .await?;
            state.current_month = Some(month);
        }

        // The day grid re-renders after a year/month change; day and view
        // are clicked together so a dropped view click redoes the pick
        let browser = self.browser;
        let cell = selectors::day_cell(plan.day);
        let view = selectors::view_button();
        let (cell, view) = (&cell, &view);
        retry(&self.retries.day, |_| async move {
            browser.click(cell).await?;
            browser.click(view).await
        })
        .await
        .map_err(|exhausted| {
            warn!(
                "Could not pick day {} for {}: {}",
                plan.day, date, exhausted.last_error
            );
            ScrapeError::DayCellNotFound {
                date,
                attempts: exhausted.attempts,
            }
        })
    }
}
