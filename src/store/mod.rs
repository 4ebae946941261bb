//! Durable measurement storage
//!
//! The store is an append-only record of measurements. Rows are inserted and
//! looked up, never edited; the only way to remove them is a whole-store reset.
//! Implementations:
//! - [`SqliteStore`]: the production store, one SQLite table with a recency index
//! - [`MemoryStore`]: a process-local store for tests and throwaway runs

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::{
    error::{AppError, Result},
    models::{Measurement, NewMeasurement},
};
use chrono::{DateTime, Datelike, Utc};

/// Persistence contract for measurements
pub trait MeasurementStore: Send + Sync {
    /// Persist a new row and return it with its assigned id.
    ///
    /// The timestamp defaults to the current time when not supplied. Timestamps
    /// keep full nanosecond precision; years outside 0000..=9999 are rejected
    /// before anything is written.
    fn insert(&self, measurement: NewMeasurement) -> Result<Measurement>;

    /// Row with the greatest timestamp, ties going to the greatest id.
    ///
    /// Fails with `AppError::NotFound` when the store is empty.
    fn most_recent(&self) -> Result<Measurement>;

    /// Fetch a row by id
    fn get(&self, id: i64) -> Result<Measurement>;

    /// Number of stored rows
    fn count(&self) -> Result<u64>;

    /// Remove every row (maintenance only)
    fn reset(&self) -> Result<()>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

/// Message used by every store when there is nothing to return
pub(crate) const EMPTY_STORE_MESSAGE: &str = "No speed test results found";

/// Years every store can persist and order
const TIMESTAMP_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

pub(crate) fn check_timestamp(timestamp: &DateTime<Utc>) -> Result<()> {
    if TIMESTAMP_YEARS.contains(&timestamp.year()) {
        Ok(())
    } else {
        Err(AppError::validation(
            "timestamp",
            format!("must be between years 0000 and 9999, got {}", timestamp),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Decimal2;
    use chrono::{Duration, TimeZone};

    fn stores() -> Vec<Box<dyn MeasurementStore>> {
        vec![
            Box::new(SqliteStore::open_in_memory().unwrap()),
            Box::new(MemoryStore::new()),
        ]
    }

    fn value(units: i64) -> Decimal2 {
        Decimal2::from_hundredths(units * 100).unwrap()
    }

    #[test]
    fn test_stores_agree_on_nanosecond_ordering() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        for store in stores() {
            let first = store
                .insert(NewMeasurement::new(value(2), value(2), value(2)).at(base + Duration::nanoseconds(900)))
                .unwrap();
            store
                .insert(NewMeasurement::new(value(3), value(3), value(3)).at(base + Duration::nanoseconds(100)))
                .unwrap();

            let latest = store.most_recent().unwrap();
            assert_eq!(latest, first, "{}", store.describe());
            assert_eq!(latest.timestamp, base + Duration::nanoseconds(900), "{}", store.describe());
        }
    }

    #[test]
    fn test_stores_reject_unrepresentable_years() {
        let too_late = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        let too_early = Utc.with_ymd_and_hms(-1, 12, 31, 0, 0, 0).unwrap();

        for store in stores() {
            for timestamp in [too_late, too_early] {
                let error = store
                    .insert(NewMeasurement::new(value(9), value(9), value(9)).at(timestamp))
                    .unwrap_err();
                assert_eq!(error.field(), Some("timestamp"), "{}", store.describe());
            }
            assert_eq!(store.count().unwrap(), 0);
            assert!(matches!(store.most_recent(), Err(AppError::NotFound(_))));
        }
    }
}
