//! SQLite-backed measurement store
//!
//! Numeric fields are written as fixed two-digit decimal text and timestamps as
//! fixed-width UTC text with nanoseconds, so both sort and round-trip exactly. The recency index
//! on `(timestamp DESC, id DESC)` serves the most-recent lookup without a scan.

use super::{check_timestamp, MeasurementStore, EMPTY_STORE_MESSAGE};
use crate::{
    error::{AppError, ErrorContext, Result},
    models::{Decimal2, Measurement, NewMeasurement},
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// How long a writer waits on a locked database file before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS speed_test_results (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        download_speed TEXT NOT NULL,
        upload_speed   TEXT NOT NULL,
        ping           TEXT NOT NULL,
        timestamp      TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_speed_test_results_recency
        ON speed_test_results (timestamp DESC, id DESC);
";

const COLUMNS: &str = "id, download_speed, upload_speed, ping, timestamp";

/// Measurement store persisted in a single SQLite table
pub struct SqliteStore {
    conn: Mutex<Connection>,
    location: String,
}

impl SqliteStore {
    /// Open (or create) a database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::storage(format!("Failed to create database directory {}: {}", parent.display(), e))
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        Self::from_connection(conn, path.display().to_string())
    }

    /// Open a private in-memory database, empty on every call
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn, ":memory:".to_string())
    }

    fn from_connection(conn: Connection, location: String) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA).context("Failed to create schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::storage("Database connection lock poisoned"))
    }
}

impl MeasurementStore for SqliteStore {
    fn insert(&self, measurement: NewMeasurement) -> Result<Measurement> {
        let timestamp = measurement.timestamp.unwrap_or_else(Utc::now);
        check_timestamp(&timestamp)?;

        let mut conn = self.connection()?;
        // Rolled back on drop if the returned row cannot be read back
        let tx = conn.transaction().context("Failed to begin insert")?;
        let sql = format!(
            "INSERT INTO speed_test_results (download_speed, upload_speed, ping, timestamp)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {}",
            COLUMNS
        );
        let stored = tx
            .query_row(
                &sql,
                params![
                    measurement.download_speed,
                    measurement.upload_speed,
                    measurement.ping,
                    format_timestamp(&timestamp),
                ],
                map_row,
            )
            .context("Failed to insert measurement")?;
        tx.commit().context("Failed to commit measurement")?;
        Ok(stored)
    }

    fn most_recent(&self) -> Result<Measurement> {
        let conn = self.connection()?;
        let sql = format!(
            "SELECT {} FROM speed_test_results ORDER BY timestamp DESC, id DESC LIMIT 1",
            COLUMNS
        );
        conn.query_row(&sql, [], map_row)
            .optional()
            .context("Failed to query most recent measurement")?
            .ok_or_else(|| AppError::not_found(EMPTY_STORE_MESSAGE))
    }

    fn get(&self, id: i64) -> Result<Measurement> {
        let conn = self.connection()?;
        let sql = format!("SELECT {} FROM speed_test_results WHERE id = ?1", COLUMNS);
        conn.query_row(&sql, params![id], map_row)
            .optional()
            .with_context(|| format!("Failed to query measurement {}", id))?
            .ok_or_else(|| AppError::not_found(format!("Measurement {} does not exist", id)))
    }

    fn count(&self) -> Result<u64> {
        let conn = self.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM speed_test_results", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn reset(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM speed_test_results", [])
            .context("Failed to reset measurements")?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.location)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Measurement> {
    let raw_timestamp: String = row.get(4)?;
    let timestamp = parse_timestamp(&raw_timestamp)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(Measurement {
        id: row.get(0)?,
        download_speed: row.get(1)?,
        upload_speed: row.get(2)?,
        ping: row.get(3)?,
        timestamp,
    })
}

/// Fixed-width UTC text, e.g. `2024-01-01T12:00:00.000000000Z`; sorts
/// chronologically for years 0000 through 9999
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc))
}

impl ToSql for Decimal2 {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Decimal2 {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
