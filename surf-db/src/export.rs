//! CSV export of the stored observations.
//!
//! Output has a header row: `date,time,size,period`.

use crate::ObservationStore;
use std::io::Write;

impl ObservationStore {
    /// Write every row as CSV; returns how many rows were written.
    pub fn export_csv<W: Write>(&self, writer: W) -> anyhow::Result<usize> {
        let rows = self.observations()?;
        let mut wtr = csv::Writer::from_writer(writer);
        for row in &rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        log::info!("export: wrote {} observations", rows.len());
        Ok(rows.len())
    }
}
