//! Surf CLI - Command line tool for scraping surf forecast history.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "surf-cli",
    version,
    about = "Surf forecast history scraper"
)]
struct Cli {
    #[command(subcommand)]
    command: surf_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    surf_cmd::run(cli.command).await
}
