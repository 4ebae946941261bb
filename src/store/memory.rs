//! Process-local measurement store

use super::{check_timestamp, MeasurementStore, EMPTY_STORE_MESSAGE};
use crate::{
    error::{AppError, Result},
    models::{Measurement, NewMeasurement},
};
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<Measurement>,
    next_id: i64,
}

/// Keeps measurements in memory; contents are lost when the store is dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| AppError::storage("Memory store lock poisoned"))
    }
}

impl MeasurementStore for MemoryStore {
    fn insert(&self, measurement: NewMeasurement) -> Result<Measurement> {
        let timestamp = measurement.timestamp.unwrap_or_else(Utc::now);
        check_timestamp(&timestamp)?;

        let mut state = self.state()?;
        state.next_id += 1;
        let row = Measurement {
            id: state.next_id,
            download_speed: measurement.download_speed,
            upload_speed: measurement.upload_speed,
            ping: measurement.ping,
            timestamp,
        };
        state.rows.push(row.clone());
        Ok(row)
    }

    fn most_recent(&self) -> Result<Measurement> {
        self.state()?
            .rows
            .iter()
            .max_by_key(|row| (row.timestamp, row.id))
            .cloned()
            .ok_or_else(|| AppError::not_found(EMPTY_STORE_MESSAGE))
    }

    fn get(&self, id: i64) -> Result<Measurement> {
        self.state()?
            .rows
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Measurement {} does not exist", id)))
    }

    fn count(&self) -> Result<u64> {
        Ok(self.state()?.rows.len() as u64)
    }

    fn reset(&self) -> Result<()> {
        self.state()?.rows.clear();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
