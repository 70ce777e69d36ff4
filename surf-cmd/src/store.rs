//! Store maintenance commands: reset, query by date, CSV export.

use log::info;
use std::io::{self, BufWriter};
use surf_db::ObservationStore;
use surf_utils::dates::normalize_date_tag;

/// Store file used when `--db` is not given.
pub const DEFAULT_DB: &str = "./data.db";

/// Drop the results table, asking first unless `yes` is set.
pub fn run_reset(db: &str, yes: bool) -> anyhow::Result<()> {
    let store = ObservationStore::open(db)?;
    let dropped = if yes {
        store.reset()?;
        true
    } else {
        store.reset_with_confirmation(io::stdin().lock(), io::stdout())?
    };
    if dropped {
        println!("Reset {}", db);
    }
    Ok(())
}

/// Print the rows for one date as pretty JSON.
pub fn run_query(db: &str, date: &str) -> anyhow::Result<()> {
    let tag = normalize_date_tag(date)?;
    let store = ObservationStore::open(db)?;
    let rows = store.observations_for_date(&tag)?;
    info!("{} observations for {}", rows.len(), tag);
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

pub fn run_export(db: &str, output: &str) -> anyhow::Result<()> {
    let store = ObservationStore::open(db)?;
    let file = std::fs::File::create(output)?;
    let written = store.export_csv(BufWriter::new(file))?;
    info!("Export complete. {} observations written to {}", written, output);
    Ok(())
}
