//! Scripted in-memory browser used by the unit tests.
//!
//! It models just enough of the dashboard: a jQuery-style date-picker with
//! year/month selects, a day grid and a "view" button, plus chart markers whose
//! hover fills a tooltip derived from the date being shown.

use chrono::{Datelike, NaiveDate, TimeDelta};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::browser::{Browser, Locator, WaitCondition};
use crate::error::{Result, ScrapeError};
use crate::observation::Slot;
use crate::selectors;

const MONTHS: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Goto(String),
    GoBack,
    Click(Locator),
    Fill(Locator, String),
    Hover(Locator),
    Select(Locator, String),
    Adjust(Locator),
    PageDown(Locator),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tooltip {
    pub date: String,
    pub hour: String,
    pub size: String,
    pub period: String,
}

#[derive(Default)]
struct State {
    url: String,
    calls: Vec<Call>,
    filled: HashMap<Locator, String>,
    shown: Option<NaiveDate>,
    picker_year: i32,
    picker_month0: u32,
    picked_day: Option<u32>,
    tooltip: Option<Tooltip>,
    tooltip_overrides: HashMap<Slot, Tooltip>,
    /// Remaining hovers of a slot that leave the tooltip unreadable
    broken_hovers: HashMap<Slot, u32>,
    hovers: HashMap<Slot, u32>,
    missing_days: HashSet<u32>,
    /// Remaining clicks of a day cell that miss because the grid is still rendering
    unrendered_days: HashMap<u32, u32>,
    view_click_failures: u32,
    never_clickable: HashSet<Locator>,
    redirect_on_view: u32,
    picker_value_blank: u32,
}

pub(crate) struct FakeBrowser {
    state: RefCell<State>,
}

impl FakeBrowser {
    /// A dashboard currently showing `shown`.
    pub fn showing(shown: NaiveDate) -> Self {
        FakeBrowser {
            state: RefCell::new(State {
                shown: Some(shown),
                picker_year: shown.year(),
                picker_month0: shown.month0(),
                ..State::default()
            }),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn count_calls(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn selections_of(&self, locator: &Locator) -> Vec<String> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Select(l, v) if l == locator => Some(v.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn filled(&self, locator: &Locator) -> Option<String> {
        self.state.borrow().filled.get(locator).cloned()
    }

    pub fn shown(&self) -> Option<NaiveDate> {
        self.state.borrow().shown
    }

    pub fn hovers(&self, slot: Slot) -> u32 {
        self.state.borrow().hovers.get(&slot).copied().unwrap_or(0)
    }

    pub fn override_tooltip(&self, slot: Slot, tooltip: Tooltip) {
        self.state.borrow_mut().tooltip_overrides.insert(slot, tooltip);
    }

    /// The next `times` hovers of `slot` leave the tooltip unreadable.
    pub fn break_slot(&self, slot: Slot, times: u32) {
        self.state.borrow_mut().broken_hovers.insert(slot, times);
    }

    pub fn remove_day(&self, day: u32) {
        self.state.borrow_mut().missing_days.insert(day);
    }

    /// The first `misses` clicks of `day` find no link.
    pub fn render_day_after(&self, day: u32, misses: u32) {
        self.state.borrow_mut().unrendered_days.insert(day, misses);
    }

    /// The next `times` view-button clicks fail.
    pub fn fail_view_clicks(&self, times: u32) {
        self.state.borrow_mut().view_click_failures = times;
    }

    /// The element stays present but never becomes clickable.
    pub fn never_clickable(&self, locator: Locator) {
        self.state.borrow_mut().never_clickable.insert(locator);
    }

    /// The next `times` view-button clicks bounce the tab to an ad page.
    pub fn redirect_on_view(&self, times: u32) {
        self.state.borrow_mut().redirect_on_view = times;
    }

    /// The picker value reads blank for the next `times` reads.
    pub fn blank_picker_value(&self, times: u32) {
        self.state.borrow_mut().picker_value_blank = times;
    }

    fn default_tooltip(shown: NaiveDate, slot: Slot) -> Tooltip {
        let date = shown + TimeDelta::days(i64::from(slot.day) - 1);
        Tooltip {
            date: format!("{}/{}", date.day(), date.month()),
            hour: format!("{}:00h", (u32::from(slot.hour) - 1) * 3),
            size: "1.8m".into(),
            period: "9.2s".into(),
        }
    }

    fn slot_of(locator: &Locator) -> Option<Slot> {
        let Locator::Id(id) = locator else { return None };
        let rest = id.strip_prefix("title_dia")?;
        let (day, hour) = rest.split_once("_hora")?;
        Some(Slot {
            day: day.parse().ok()?,
            hour: hour.parse().ok()?,
        })
    }

    fn tooltip_field(&self, pick: impl Fn(&Tooltip) -> String, field: &str) -> Result<String> {
        self.state
            .borrow()
            .tooltip
            .as_ref()
            .map(pick)
            .ok_or_else(|| ScrapeError::read_failure(field, "tooltip not shown"))
    }
}

impl Browser for FakeBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.url = url.to_string();
        state.calls.push(Call::Goto(url.to_string()));
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.borrow().url.clone())
    }

    async fn go_back(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::GoBack);
        let last_goto = state.calls.iter().rev().find_map(|c| match c {
            Call::Goto(url) => Some(url.clone()),
            _ => None,
        });
        if let Some(url) = last_goto {
            state.url = url;
        }
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, condition: WaitCondition, timeout: Duration) -> Result<()> {
        let clickable = condition == WaitCondition::Clickable;
        if clickable && self.state.borrow().never_clickable.contains(locator) {
            return Err(ScrapeError::UiWaitTimeout {
                target: locator.to_string(),
                waited_ms: timeout.as_millis(),
            });
        }
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Click(locator.clone()));
        if *locator == selectors::view_button() {
            if state.view_click_failures > 0 {
                state.view_click_failures -= 1;
                return Err(ScrapeError::read_failure(locator.to_string(), "click intercepted"));
            }
            if let Some(day) = state.picked_day.take() {
                state.shown = NaiveDate::from_ymd_opt(state.picker_year, state.picker_month0 + 1, day);
            }
            if state.redirect_on_view > 0 {
                state.redirect_on_view -= 1;
                state.url = "https://ads.example.com/landing".into();
            }
            return Ok(());
        }
        if let Locator::XPath(expr) = locator {
            if expr.contains("ui-datepicker-div") {
                let day = (1..=31)
                    .find(|d| *locator == selectors::day_cell(*d))
                    .ok_or_else(|| ScrapeError::read_failure("day cell", "bad locator"))?;
                if state.missing_days.contains(&day) {
                    return Err(ScrapeError::read_failure("day cell", format!("no link for {day}")));
                }
                if let Some(misses) = state.unrendered_days.get_mut(&day).filter(|m| **m > 0) {
                    *misses -= 1;
                    return Err(ScrapeError::read_failure("day cell", format!("{day} not rendered")));
                }
                state.picked_day = Some(day);
            }
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.filled.insert(locator.clone(), text.to_string());
        state.calls.push(Call::Fill(locator.clone(), text.to_string()));
        Ok(())
    }

    async fn hover(&self, locator: &Locator) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Hover(locator.clone()));
        let slot = Self::slot_of(locator)
            .ok_or_else(|| ScrapeError::read_failure(locator.to_string(), "not a chart"))?;
        *state.hovers.entry(slot).or_default() += 1;
        let broken = match state.broken_hovers.get_mut(&slot) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        };
        let tooltip = if broken {
            None
        } else if let Some(tooltip) = state.tooltip_overrides.get(&slot) {
            Some(tooltip.clone())
        } else {
            state.shown.map(|shown| Self::default_tooltip(shown, slot))
        };
        state.tooltip = tooltip;
        Ok(())
    }

    async fn text(&self, locator: &Locator) -> Result<String> {
        if *locator == selectors::tooltip_date() {
            self.tooltip_field(|t| t.date.clone(), "date")
        } else if *locator == selectors::tooltip_hour() {
            self.tooltip_field(|t| t.hour.clone(), "hour")
        } else if *locator == selectors::tooltip_wave_size() {
            self.tooltip_field(|t| t.size.clone(), "size")
        } else if *locator == selectors::tooltip_wave_period() {
            self.tooltip_field(|t| t.period.clone(), "period")
        } else {
            Err(ScrapeError::read_failure(locator.to_string(), "no text"))
        }
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        let mut state = self.state.borrow_mut();
        if *locator != selectors::date_picker() || name != "value" {
            return Ok(None);
        }
        if state.picker_value_blank > 0 {
            state.picker_value_blank -= 1;
            return Ok(Some(String::new()));
        }
        Ok(state
            .shown
            .map(|d| format!("{} - {}", MONTHS[d.month0() as usize], d.year())))
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Select(locator.clone(), value.to_string()));
        let parsed: i32 = value
            .parse()
            .map_err(|_| ScrapeError::read_failure(locator.to_string(), "no such option"))?;
        if *locator == selectors::year_select() {
            state.picker_year = parsed;
        } else if *locator == selectors::month_select() {
            state.picker_month0 = parsed as u32;
        }
        Ok(())
    }

    async fn adjust(&self, locator: &Locator, _function: &str) -> Result<()> {
        self.state.borrow_mut().calls.push(Call::Adjust(locator.clone()));
        Ok(())
    }

    async fn page_down(&self, locator: &Locator) -> Result<()> {
        self.state.borrow_mut().calls.push(Call::PageDown(locator.clone()));
        Ok(())
    }
}
