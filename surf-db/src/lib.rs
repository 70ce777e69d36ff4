//! SQLite observation store for scraped surf forecasts.
//!
//! The scraper hands every observation, good or sentinel, to an
//! [`ObservationStore`] one row at a time. There is no transaction across
//! rows: an interrupted run leaves whatever it had written.
//!
//! # Usage
//!
//! ```rust
//! use surf_db::ObservationStore;
//!
//! let store = ObservationStore::open_in_memory().unwrap();
//! store.insert("5-12-2019", 14, 1.8, 9.2).unwrap();
//!
//! let rows = store.observations_for_date("5-12-2019").unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].time, 14);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the SQL schema.

pub mod schema;
mod export;
mod queries;
pub mod models;

use log::info;
use rusqlite::{params, Connection};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::Path;
use std::rc::Rc;
use surf_forecast::error::ScrapeError;
use surf_forecast::observation::{Observation, ObservationSink};

use crate::models::ObservationRow;

/// SQLite-backed observation store.
///
/// Cheaply cloneable (via `Rc`): a scraping session can own one handle
/// while the caller keeps another to query the results afterwards.
#[derive(Clone)]
pub struct ObservationStore {
    conn: Rc<RefCell<Connection>>,
}

impl ObservationStore {
    /// Open (or create) the store file and make sure the table exists.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        info!("Opened observation store {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> anyhow::Result<Self> {
        let store = Self {
            conn: Rc::new(RefCell::new(conn)),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the `results` table if it is missing.
    pub fn ensure_schema(&self) -> anyhow::Result<()> {
        self.conn.borrow().execute_batch(schema::create_schema())?;
        Ok(())
    }

    pub fn insert(&self, date: &str, time: i64, size: f64, period: f64) -> anyhow::Result<()> {
        self.conn.borrow().execute(
            "INSERT INTO results (date, time, size, period) VALUES (?1, ?2, ?3, ?4)",
            params![date, time, size, period],
        )?;
        Ok(())
    }

    pub fn insert_observation(&self, observation: &Observation) -> anyhow::Result<()> {
        let row = ObservationRow::from(observation);
        self.insert(&row.date, row.time, row.size, row.period)
    }

    /// Drop the `results` table. Call [`ensure_schema`](Self::ensure_schema)
    /// before writing again.
    pub fn reset(&self) -> anyhow::Result<()> {
        self.conn.borrow().execute_batch(schema::drop_schema())?;
        info!("Observation store reset");
        Ok(())
    }

    /// Ask on `output` before resetting; only a `y` answer on `input` proceeds.
    ///
    /// Returns whether the table was dropped.
    pub fn reset_with_confirmation<R: BufRead, W: Write>(
        &self,
        mut input: R,
        mut output: W,
    ) -> anyhow::Result<bool> {
        write!(output, "Are you sure you want to reset DB? [y/N]: ")?;
        output.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if answer.trim_end_matches(['\r', '\n']) == "y" {
            self.reset()?;
            Ok(true)
        } else {
            info!("Reset cancelled");
            Ok(false)
        }
    }
}

impl ObservationSink for ObservationStore {
    fn record(&mut self, observation: &Observation) -> Result<(), ScrapeError> {
        self.insert_observation(observation)
            .map_err(|e| ScrapeError::StoreWriteFailure(e.to_string()))
    }
}
