//! One logged-in walk over a date range.
//!
//! A [`Session`] owns the browser, the observation sink and the navigation
//! state. [`Session::start`] logs in; [`Session::run`] visits every date of
//! the range and reports how the walk ended instead of failing outright.

use chrono::NaiveDate;
use log::{info, warn};
use std::fmt;

use crate::browser::{Browser, WaitCondition};
use crate::config::ScrapeConfig;
use crate::date_range::DateRange;
use crate::error::{Result, ScrapeError};
use crate::extractor::{ExtractionSummary, Extractor, ViewContext};
use crate::navigator::{NavigationState, Navigator};
use crate::observation::ObservationSink;
use crate::retry::retry;
use crate::selectors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    Iterating(NaiveDate),
    Done,
}

/// What a run got through before it ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Year shown by the date-picker when the walk began
    pub page_year: Option<i32>,
    pub dates_visited: u32,
    /// Dates whose day cell could not be picked; nothing was extracted for them
    pub skipped_dates: Vec<NaiveDate>,
    pub extraction: ExtractionSummary,
}

impl RunReport {
    /// Sentinel rows, lost writes and skipped dates.
    pub fn error_count(&self) -> u32 {
        self.extraction.error_slots + self.extraction.lost_writes + self.skipped_dates.len() as u32
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dates visited, {} observations recorded, {} error slots, {} lost writes, {} dates skipped",
            self.dates_visited,
            self.extraction.recorded,
            self.extraction.error_slots,
            self.extraction.lost_writes,
            self.skipped_dates.len()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(RunReport),
    CompletedWithErrors { report: RunReport, errors: u32 },
    Aborted { report: RunReport, cause: ScrapeError },
}

impl RunOutcome {
    pub fn report(&self) -> &RunReport {
        match self {
            RunOutcome::Completed(report) => report,
            RunOutcome::CompletedWithErrors { report, .. } => report,
            RunOutcome::Aborted { report, .. } => report,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, RunOutcome::Aborted { .. })
    }
}

/// Year from the picker's `"<month> - <year>"` value.
pub fn parse_picker_year(value: &str) -> Result<i32> {
    value
        .rsplit('-')
        .next()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ScrapeError::read_failure("date-picker year", "value is empty"))?
        .parse()
        .map_err(|e| ScrapeError::read_failure("date-picker year", format!("{value:?}: {e}")))
}

pub struct Session<B, S> {
    browser: B,
    sink: S,
    config: ScrapeConfig,
    state: SessionState,
    navigation: NavigationState,
}

impl<B: Browser, S: ObservationSink> Session<B, S> {
    pub fn new(browser: B, sink: S, config: ScrapeConfig) -> Self {
        Session {
            browser,
            sink,
            config,
            state: SessionState::Unauthenticated,
            navigation: NavigationState::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (B, S) {
        (self.browser, self.sink)
    }

    /// Open the target page, accept cookies and log in.
    ///
    /// There is no check that the login worked; a failure shows up later as
    /// pages that never become ready.
    pub async fn start(&mut self) -> Result<()> {
        info!("Opening {}", self.config.target_url);
        self.browser.goto(&self.config.target_url).await?;

        let accept = selectors::cookie_accept();
        self.browser
            .wait_for(&accept, WaitCondition::Clickable, self.config.timeouts.cookie())
            .await?;
        self.browser.click(&accept).await?;

        self.login().await?;
        self.state = SessionState::Authenticated;
        info!("Logged in as {}", self.config.credentials.email);
        Ok(())
    }

    async fn login(&self) -> Result<()> {
        self.browser.click(&selectors::login_link()).await?;
        let email = selectors::email_field();
        self.browser
            .wait_for(&email, WaitCondition::Clickable, self.config.timeouts.page())
            .await?;
        self.browser
            .fill(&email, &self.config.credentials.email)
            .await?;
        self.browser
            .fill(&selectors::password_field(), &self.config.credentials.password)
            .await?;
        self.browser.click(&selectors::login_submit()).await
    }

    /// Ads sometimes navigate the tab away; step back to the forecast page.
    ///
    /// Returns whether it went back. The reloaded page may show a different
    /// picker position, so callers must forget their navigation state then.
    pub async fn leave_redirect(&self) -> Result<bool> {
        let url = self.browser.current_url().await?;
        if url == self.config.target_url {
            return Ok(false);
        }
        warn!("Redirected to {}, going back", url);
        self.browser.go_back().await?;
        Ok(true)
    }

    /// Scroll so the charts take hover events, then read the picker's year.
    pub async fn resolve_current_year(&self) -> Result<i32> {
        let browser = &self.browser;
        let timeout = self.config.timeouts.page();
        retry(&self.config.retries.year, |_| async move {
            let body = selectors::page_body();
            browser
                .wait_for(&body, WaitCondition::Clickable, timeout)
                .await?;
            browser.page_down(&body).await?;

            let picker = selectors::date_picker();
            browser
                .wait_for(&picker, WaitCondition::Present, timeout)
                .await?;
            let value = browser.attribute(&picker, "value").await?.unwrap_or_default();
            parse_picker_year(&value)
        })
        .await
        .map_err(|exhausted| exhausted.last_error)
    }

    /// Visit every date of `range`, extracting and recording its forecast grid.
    pub async fn run(&mut self, range: DateRange) -> RunOutcome {
        let mut report = RunReport::default();
        match self.walk(range, &mut report).await {
            Ok(()) => {
                self.state = SessionState::Done;
                info!("Run complete: {}", report);
                match report.error_count() {
                    0 => RunOutcome::Completed(report),
                    errors => RunOutcome::CompletedWithErrors { report, errors },
                }
            }
            Err(cause) => {
                warn!("Run aborted: {} ({})", cause, report);
                RunOutcome::Aborted { report, cause }
            }
        }
    }

    async fn walk(&mut self, range: DateRange, report: &mut RunReport) -> Result<()> {
        if self.state == SessionState::Unauthenticated {
            return Err(ScrapeError::NotAuthenticated);
        }
        let page_year = self.resolve_current_year().await?;
        report.page_year = Some(page_year);

        for date in range.dates() {
            self.state = SessionState::Iterating(date);
            info!("Visiting {}", date);
            if self.leave_redirect().await? {
                self.navigation.forget();
            }

            let navigator = Navigator::new(&self.browser, &self.config.timeouts, &self.config.retries);
            match navigator.select(date, &mut self.navigation).await {
                Ok(()) => {}
                Err(ScrapeError::DayCellNotFound { .. }) => {
                    // The view still shows some earlier date; don't attribute it to this one
                    warn!("Skipping {}: calendar day could not be selected", date);
                    report.skipped_dates.push(date);
                    self.navigation.forget();
                    continue;
                }
                Err(e) => return Err(e),
            }

            let view = ViewContext {
                year: self.navigation.year().unwrap_or(page_year),
                month: self.navigation.month(),
            };
            if self.leave_redirect().await? {
                self.navigation.forget();
            }
            let extractor = Extractor::new(&self.browser, &self.config.retries);
            let summary = extractor
                .extract_for_current_view(view, &mut self.sink)
                .await;
            report.dates_visited += 1;
            report.extraction.merge(summary);
        }
        Ok(())
    }
}
