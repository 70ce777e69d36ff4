//! [`Browser`] implementation over a Chrome tab driven by chromiumoxide.

use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use log::{debug, info};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::browser::{Browser, Locator, WaitCondition};
use crate::error::{Result, ScrapeError};

/// Pause between readiness checks in [`Browser::wait_for`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

const IS_CLICKABLE: &str = "function() { \
    const rect = this.getBoundingClientRect(); \
    const style = window.getComputedStyle(this); \
    return rect.width > 0 && rect.height > 0 && style.visibility !== 'hidden' && !this.disabled; \
}";

const CLEAR_VALUE: &str = "function() { this.value = ''; }";

#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeOptions {
    pub headless: bool,
}

/// A launched Chrome process with the single tab the scraper drives.
pub struct ChromeBrowser {
    browser: CdpBrowser,
    page: Page,
    handler: JoinHandle<()>,
}

fn cdp_error(err: chromiumoxide::error::CdpError) -> ScrapeError {
    ScrapeError::Browser(err.to_string())
}

impl ChromeBrowser {
    pub async fn launch(options: ChromeOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder().window_size(1366, 900);
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(ScrapeError::Browser)?;
        let (browser, mut events) = CdpBrowser::launch(config).await.map_err(cdp_error)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    debug!("Chrome event loop stopped: {}", e);
                    break;
                }
            }
        });
        let page = browser.new_page("about:blank").await.map_err(cdp_error)?;
        info!("Chrome launched (headless: {})", options.headless);
        Ok(ChromeBrowser {
            browser,
            page,
            handler,
        })
    }

    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await.map_err(cdp_error)?;
        self.browser.wait().await.map_err(|e| ScrapeError::Browser(e.to_string()))?;
        let _ = self.handler.await;
        Ok(())
    }

    async fn find(&self, locator: &Locator) -> Result<Element> {
        let found = match locator {
            Locator::XPath(expression) => self.page.find_xpath(expression.as_str()).await,
            other => {
                self.page
                    .find_element(other.as_css().unwrap_or_default())
                    .await
            }
        };
        found.map_err(|e| ScrapeError::read_failure(locator.to_string(), e.to_string()))
    }

    /// Call a JS function on the element and return its JSON result.
    async fn call(&self, locator: &Locator, function: &str) -> Result<Option<serde_json::Value>> {
        let element = self.find(locator).await?;
        let returns = element
            .call_js_fn(function, false)
            .await
            .map_err(cdp_error)?;
        Ok(returns.result.value)
    }

    async fn is_ready(&self, locator: &Locator, condition: WaitCondition) -> bool {
        match condition {
            WaitCondition::Present => self.find(locator).await.is_ok(),
            WaitCondition::Clickable => matches!(
                self.call(locator, IS_CLICKABLE).await,
                Ok(Some(serde_json::Value::Bool(true)))
            ),
        }
    }
}

impl Browser for ChromeBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await.map_err(cdp_error)?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await.map_err(cdp_error)?.unwrap_or_default())
    }

    async fn go_back(&self) -> Result<()> {
        self.page
            .evaluate("window.history.go(-1)")
            .await
            .map_err(cdp_error)?;
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, condition: WaitCondition, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            if self.is_ready(locator, condition).await {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(ScrapeError::UiWaitTimeout {
                    target: locator.to_string(),
                    waited_ms: started.elapsed().as_millis(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        self.find(locator).await?.click().await.map_err(cdp_error)?;
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        let element = self.find(locator).await?;
        element.click().await.map_err(cdp_error)?;
        element.call_js_fn(CLEAR_VALUE, false).await.map_err(cdp_error)?;
        element.type_str(text).await.map_err(cdp_error)?;
        Ok(())
    }

    async fn hover(&self, locator: &Locator) -> Result<()> {
        self.find(locator).await?.hover().await.map_err(cdp_error)?;
        Ok(())
    }

    async fn text(&self, locator: &Locator) -> Result<String> {
        self.find(locator)
            .await?
            .inner_text()
            .await
            .map_err(cdp_error)?
            .ok_or_else(|| ScrapeError::read_failure(locator.to_string(), "element has no text"))
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        // Live DOM property first: inputs keep their current value there, not in the attribute
        let name = serde_json::to_string(name).map_err(|e| ScrapeError::Browser(e.to_string()))?;
        let function = format!(
            "function() {{ const v = this[{name}] ?? this.getAttribute({name}); return v == null ? null : String(v); }}"
        );
        Ok(match self.call(locator, &function).await? {
            Some(serde_json::Value::String(value)) => Some(value),
            _ => None,
        })
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> Result<()> {
        let quoted = serde_json::to_string(value).map_err(|e| ScrapeError::Browser(e.to_string()))?;
        let function = format!(
            "function() {{ \
                if (![...this.options].some(o => o.value === {quoted})) return false; \
                this.value = {quoted}; \
                this.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                return true; \
            }}"
        );
        match self.call(locator, &function).await? {
            Some(serde_json::Value::Bool(true)) => Ok(()),
            _ => Err(ScrapeError::read_failure(
                locator.to_string(),
                format!("no option with value {value}"),
            )),
        }
    }

    async fn adjust(&self, locator: &Locator, function: &str) -> Result<()> {
        self.call(locator, function).await?;
        Ok(())
    }

    async fn page_down(&self, locator: &Locator) -> Result<()> {
        self.find(locator)
            .await?
            .press_key("PageDown")
            .await
            .map_err(cdp_error)?;
        Ok(())
    }
}
