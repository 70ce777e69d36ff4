//! Command implementations for the surf forecast CLI.
//!
//! Provides subcommands for scraping forecast history into a SQLite store
//! and for inspecting, exporting and resetting that store.

use clap::Subcommand;

pub mod scrape;
pub mod store;

pub use scrape::ScrapeArgs;

#[derive(Subcommand)]
pub enum Command {
    /// Log in, walk the date range and record every forecast slot
    Scrape(ScrapeArgs),

    /// Drop the results table (asks for confirmation)
    ResetDb {
        /// Path to the SQLite store
        #[arg(long, default_value = store::DEFAULT_DB)]
        db: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Print the observations recorded for one date as JSON
    Query {
        /// Path to the SQLite store
        #[arg(long, default_value = store::DEFAULT_DB)]
        db: String,

        /// Date as YYYY-MM-DD or the site's d-m-Y tag
        #[arg(short = 'd', long)]
        date: String,
    },

    /// Write every stored observation to a CSV file
    Export {
        /// Path to the SQLite store
        #[arg(long, default_value = store::DEFAULT_DB)]
        db: String,

        /// Output CSV path
        #[arg(short = 'o', long)]
        output: String,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Scrape(args) => scrape::run_scrape(args).await,
        Command::ResetDb { db, yes } => store::run_reset(&db, yes),
        Command::Query { db, date } => store::run_query(&db, &date),
        Command::Export { db, output } => store::run_export(&db, &output),
    }
}
