//! Measurement service
//!
//! Orchestrates producer → store → response for the three operations clients
//! use: read the current speeds, run a test, and save an external result.
//! Every call is a single attempt; store errors propagate unchanged.

pub mod validation;

pub use validation::{validate_speed_test_input, ValidatedInput};

use crate::{
    error::{AppError, Result},
    models::{CurrentSpeeds, Decimal2, Measurement, NewMeasurement, SpeedSample, SpeedTestInput},
    producer::MeasurementProducer,
    store::MeasurementStore,
};
use std::sync::Arc;

/// Speed test operations over an injected store and producer
#[derive(Clone)]
pub struct SpeedTestService {
    store: Arc<dyn MeasurementStore>,
    producer: Arc<dyn MeasurementProducer>,
}

impl SpeedTestService {
    /// Create a service from an explicitly constructed store and producer
    pub fn new(store: Arc<dyn MeasurementStore>, producer: Arc<dyn MeasurementProducer>) -> Self {
        Self { store, producer }
    }

    pub fn store(&self) -> &Arc<dyn MeasurementStore> {
        &self.store
    }

    pub fn producer(&self) -> &Arc<dyn MeasurementProducer> {
        &self.producer
    }

    /// Most recent measurement as current speeds.
    ///
    /// An empty store yields `AppError::NoData`, which callers render as an
    /// empty state rather than a failure.
    pub async fn get_current_speeds(&self) -> Result<CurrentSpeeds> {
        let latest = self
            .with_store(|store| store.most_recent())
            .await
            .map_err(|e| match e {
                AppError::NotFound(msg) => AppError::no_data(msg),
                other => other,
            })?;
        Ok(latest.to_current_speeds())
    }

    /// Produce a new measurement and persist it with the current time
    pub async fn run_speed_test(&self) -> Result<Measurement> {
        let sample = self.producer.generate().await?;
        let new = normalize_sample(&sample, self.producer.name())?;
        self.with_store(move |store| store.insert(new)).await
    }

    /// Validate and persist an externally supplied result
    pub async fn save_speed_test(&self, input: SpeedTestInput) -> Result<Measurement> {
        let validated = validate_speed_test_input(&input)?;
        let new = validated.into_new_measurement();
        self.with_store(move |store| store.insert(new)).await
    }

    /// Run a store call off the async executor
    async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn MeasurementStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref())).await?
    }
}

/// Convert producer output to storage precision.
///
/// Producer values are trusted to be positive and are not checked against the
/// caller-input constraints; only the storage range applies.
fn normalize_sample(sample: &SpeedSample, producer: &str) -> Result<NewMeasurement> {
    let convert = |field: &str, value: f64| {
        Decimal2::from_f64(value).map_err(|e| {
            AppError::storage(format!("Producer '{}' returned unstorable {}: {}", producer, field, e))
        })
    };
    Ok(NewMeasurement::new(
        convert("download_speed", sample.download_mbps)?,
        convert("upload_speed", sample.upload_mbps)?,
        convert("ping", sample.ping_ms)?,
    ))
}
