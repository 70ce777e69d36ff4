//! The `scrape` command: log in and record forecast history into the store.

use clap::Args;
use log::{info, warn};
use surf_db::ObservationStore;
use surf_forecast::chrome::{ChromeBrowser, ChromeOptions};
use surf_forecast::config::ScrapeConfig;
use surf_forecast::session::{RunOutcome, Session};
use surf_utils::dates::{format_date, parse_date};

use crate::store::DEFAULT_DB;

#[derive(Args, Debug, Clone)]
pub struct ScrapeArgs {
    /// JSON config file; flags below override its values
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// Path to the SQLite store
    #[arg(long, default_value = DEFAULT_DB)]
    pub db: String,

    /// First date to visit (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Stop before this date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Days between visited dates
    #[arg(long)]
    pub stride: Option<u32>,

    /// Forecast page to scrape
    #[arg(long)]
    pub target_url: Option<String>,

    #[arg(long, env = "SURF_EMAIL")]
    pub email: Option<String>,

    #[arg(long, env = "SURF_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Run Chrome without a window
    #[arg(long)]
    pub headless: bool,
}

impl ScrapeArgs {
    /// Config file (or defaults) with command-line overrides applied, validated.
    pub fn build_config(&self) -> anyhow::Result<ScrapeConfig> {
        let mut config = match &self.config {
            Some(path) => ScrapeConfig::from_path(path)?,
            None => ScrapeConfig::default(),
        };
        if let Some(url) = &self.target_url {
            config.target_url = url.clone();
        }
        if let Some(start) = &self.start {
            config.range.start = parse_date(start)?;
        }
        if let Some(end) = &self.end {
            config.range.end = parse_date(end)?;
        }
        if let Some(stride) = self.stride {
            config.range.stride = stride;
        }
        if let Some(email) = &self.email {
            config.credentials.email = email.clone();
        }
        if let Some(password) = &self.password {
            config.credentials.password = password.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Run a full scrape of the configured date range.
///
/// Completed runs succeed even when some slots were recorded as errors;
/// an aborted run is returned as an error so the process exits non-zero.
pub async fn run_scrape(args: ScrapeArgs) -> anyhow::Result<()> {
    let config = args.build_config()?;
    let store = ObservationStore::open(&args.db)?;
    let rows_before = store.count()?;

    info!(
        "Scraping {} from {} to {} every {} days",
        config.target_url,
        format_date(&config.range.start),
        format_date(&config.range.end),
        config.range.stride
    );

    let browser = ChromeBrowser::launch(ChromeOptions {
        headless: args.headless,
    })
    .await?;
    let (range, target_url) = (config.range, config.target_url.clone());
    let mut session = Session::new(browser, store.clone(), config);

    let outcome = match session.start().await {
        Ok(()) => Some(session.run(range).await),
        Err(e) => {
            warn!("Login failed: {}", e);
            None
        }
    };

    let (browser, _) = session.into_parts();
    if let Err(e) = browser.close().await {
        warn!("Chrome did not shut down cleanly: {}", e);
    }

    let Some(outcome) = outcome else {
        anyhow::bail!("could not open {} and log in", target_url);
    };
    let added = store.count()? - rows_before;
    println!("{}", outcome.report());
    println!("{} rows added to {}", added, args.db);

    match outcome {
        RunOutcome::Completed(_) => Ok(()),
        RunOutcome::CompletedWithErrors { errors, .. } => {
            warn!("{} slots or dates could not be scraped", errors);
            Ok(())
        }
        RunOutcome::Aborted { cause, .. } => Err(anyhow::anyhow!("scrape aborted: {}", cause)),
    }
}
