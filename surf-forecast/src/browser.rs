//! The browser-automation capability the scraper drives.
//!
//! [`Browser`] is deliberately narrow: everything the calendar navigation and
//! tooltip extraction need, nothing more. The `chrome` feature provides an
//! implementation over chromiumoxide; tests use a scripted fake.

use std::fmt;
use std::time::Duration;

use crate::error::Result;

/// How to find an element on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Id(String),
    Css(String),
    XPath(String),
    Tag(String),
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Locator::Tag(name.into())
    }

    /// The locator as a CSS selector, if it can be expressed as one.
    pub fn as_css(&self) -> Option<String> {
        match self {
            Locator::Id(id) => Some(format!("#{id}")),
            Locator::Css(selector) => Some(selector.clone()),
            Locator::Tag(name) => Some(name.clone()),
            Locator::XPath(_) => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id={id}"),
            Locator::Css(selector) => write!(f, "css={selector}"),
            Locator::XPath(expression) => write!(f, "xpath={expression}"),
            Locator::Tag(name) => write!(f, "tag={name}"),
        }
    }
}

/// Readiness predicate for [`Browser::wait_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// The element exists in the DOM
    Present,
    /// The element is displayed and enabled
    Clickable,
}

/// Browser operations used by the session, navigator and extractor.
///
/// Element operations fail with [`ScrapeError::ElementReadFailure`] when the
/// element cannot be found, and [`ScrapeError::Browser`] for driver faults.
/// `wait_for` fails with [`ScrapeError::UiWaitTimeout`].
///
/// [`ScrapeError::ElementReadFailure`]: crate::error::ScrapeError::ElementReadFailure
/// [`ScrapeError::Browser`]: crate::error::ScrapeError::Browser
/// [`ScrapeError::UiWaitTimeout`]: crate::error::ScrapeError::UiWaitTimeout
#[allow(async_fn_in_trait)]
pub trait Browser {
    async fn goto(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// Go back one entry in the tab's history.
    async fn go_back(&self) -> Result<()>;

    /// Poll until `condition` holds for `locator`, or time out.
    async fn wait_for(&self, locator: &Locator, condition: WaitCondition, timeout: Duration)
        -> Result<()>;

    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Clear the field then type `text` into it.
    async fn fill(&self, locator: &Locator, text: &str) -> Result<()>;

    /// Move the pointer over the element so hover handlers fire.
    async fn hover(&self, locator: &Locator) -> Result<()>;

    async fn text(&self, locator: &Locator) -> Result<String>;

    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>>;

    /// Pick the `<option>` with the given value in a `<select>`.
    async fn select_option(&self, locator: &Locator, value: &str) -> Result<()>;

    /// Run a JavaScript function body against the element (`this` is bound to it).
    async fn adjust(&self, locator: &Locator, function: &str) -> Result<()>;

    /// Send a PageDown key press to the element.
    async fn page_down(&self, locator: &Locator) -> Result<()>;
}
