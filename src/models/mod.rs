//! Data models and structures for the speed monitor

pub mod config;
pub mod decimal;
pub mod measurement;

// Re-export main model types
pub use config::Config;
pub use decimal::{Decimal2, DecimalError};
pub use measurement::{CurrentSpeeds, Measurement, NewMeasurement, SpeedSample, SpeedTestInput};
