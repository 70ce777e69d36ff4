//! Typed read queries over the `results` table.
//!
//! Rows come back in insertion order (SQLite rowid), which is the order the
//! scraper walked dates and chart slots.

use crate::models::ObservationRow;
use crate::ObservationStore;
use rusqlite::{params, Row};
use surf_forecast::observation::ERROR_DATE_TAG;

fn to_row(row: &Row<'_>) -> rusqlite::Result<ObservationRow> {
    Ok(ObservationRow {
        date: row.get(0)?,
        time: row.get(1)?,
        size: row.get(2)?,
        period: row.get(3)?,
    })
}

impl ObservationStore {
    pub fn count(&self) -> anyhow::Result<i64> {
        let conn = self.conn.borrow();
        let count = conn.query_row("SELECT COUNT(*) FROM results", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Number of sentinel rows, i.e. slots that could not be read.
    pub fn error_count(&self) -> anyhow::Result<i64> {
        let conn = self.conn.borrow();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM results WHERE date = ?1",
            params![ERROR_DATE_TAG],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Every stored row, in insertion order.
    pub fn observations(&self) -> anyhow::Result<Vec<ObservationRow>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT date, time, size, period FROM results ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], to_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("query: observations returned {} records", rows.len());
        Ok(rows)
    }

    /// Rows for one `d-m-Y` date tag, ordered by hour.
    pub fn observations_for_date(&self, date_tag: &str) -> anyhow::Result<Vec<ObservationRow>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT date, time, size, period FROM results
             WHERE date = ?1
             ORDER BY time, rowid",
        )?;
        let rows = stmt
            .query_map(params![date_tag], to_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "query: observations_for_date({}) returned {} records",
            date_tag,
            rows.len()
        );
        Ok(rows)
    }
}
