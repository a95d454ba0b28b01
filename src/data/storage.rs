//! SQLite storage layer for weight entries and preferences.
//!
//! Database schema:
//! - `weights` table: date (TEXT, primary key), weight (REAL)
//! - `preferences` table: key (TEXT, primary key), value (TEXT)

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::debug;

use crate::data::WeightEntry;
use crate::error::{Error, Result};

/// Preferences key holding the persisted default graph range token
const DEFAULT_RANGE_KEY: &str = "default_range";

const ISO_DATE: &str = "%Y-%m-%d";

fn read_row(row: &Row) -> rusqlite::Result<(String, f64)> {
    Ok((row.get(0)?, row.get(1)?))
}

/// Decode one stored row into a typed entry, rejecting malformed values
/// at the storage boundary.
fn decode_entry(date: &str, weight: f64) -> Result<WeightEntry> {
    let date = NaiveDate::parse_from_str(date, ISO_DATE)
        .map_err(|_| Error::Storage(format!("malformed date in weights table: `{date}`")))?;
    if !weight.is_finite() {
        return Err(Error::Storage(format!(
            "malformed weight in weights table for {date}"
        )));
    }
    Ok(WeightEntry::new(date, weight))
}

/// Storage interface over the local weight database
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open the database at `path`, creating the file and schema if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS weights (
                 date TEXT PRIMARY KEY,
                 weight REAL NOT NULL
             );
             CREATE TABLE IF NOT EXISTS preferences (
                 key TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );",
        )?;

        debug!(path = %path.display(), "opened weight database");
        Ok(Storage { conn })
    }

    /// Insert or overwrite the entry for a date.
    pub fn upsert_entry(&self, date: NaiveDate, weight: f64) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO weights (date, weight) VALUES (?1, ?2)",
            rusqlite::params![date.format(ISO_DATE).to_string(), weight],
        )?;
        Ok(())
    }

    /// Entries with date >= `start`, ascending by date; all entries when
    /// `start` is `None`. An empty result is valid.
    pub fn query_range(&self, start: Option<NaiveDate>) -> Result<Vec<WeightEntry>> {
        let mut stmt;
        let rows = match start {
            Some(start) => {
                stmt = self
                    .conn
                    .prepare("SELECT date, weight FROM weights WHERE date >= ?1 ORDER BY date")?;
                stmt.query_map([start.format(ISO_DATE).to_string()], read_row)?
            }
            None => {
                stmt = self
                    .conn
                    .prepare("SELECT date, weight FROM weights ORDER BY date")?;
                stmt.query_map([], read_row)?
            }
        };

        let mut entries = Vec::new();
        for row in rows {
            let (date, weight) = row?;
            entries.push(decode_entry(&date, weight)?);
        }

        debug!(count = entries.len(), "queried weight entries");
        Ok(entries)
    }

    /// The persisted default range token, if one was ever set.
    pub fn get_default_range(&self) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [DEFAULT_RANGE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Persist `token` as the default range.
    pub fn set_default_range(&self, token: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
            [DEFAULT_RANGE_KEY, token],
        )?;
        Ok(())
    }

    /// Bulk-upsert externally sourced entries in a single transaction.
    /// Duplicate dates overwrite, same as `upsert_entry`.
    pub fn import_legacy(&mut self, entries: &[WeightEntry]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for entry in entries {
            tx.execute(
                "INSERT OR REPLACE INTO weights (date, weight) VALUES (?1, ?2)",
                rusqlite::params![entry.date.format(ISO_DATE).to_string(), entry.weight],
            )?;
        }
        tx.commit()?;

        debug!(count = entries.len(), "imported legacy entries");
        Ok(entries.len())
    }
}
