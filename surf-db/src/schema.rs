//! SQL schema for the observation store.
//!
//! A single `results` table, one row per chart slot read. Dates are stored
//! as the site's `d-m-Y` text tag (or `error` for sentinel rows), so there
//! is no key; rows are kept in insertion order by SQLite's rowid.

/// Returns the schema as a single batch string.
///
/// - `date` - `d-m-Y` tag of the forecast day, or `error`
/// - `time` - hour of day
/// - `size` - wave size in metres
/// - `period` - wave period in seconds
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS results (
        date TEXT,
        time INTEGER,
        size FLOAT,
        period FLOAT
    );
    "#
}

/// Drops everything [`create_schema`] creates.
pub fn drop_schema() -> &'static str {
    "DROP TABLE IF EXISTS results;"
}
