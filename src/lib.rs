//! Speed Monitor
//!
//! Records internet speed test results (download, upload, ping) in a local
//! SQLite database and exposes the most recent one through a CLI and a small
//! HTTP API. New results are either produced on demand or supplied by callers.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod producer;
pub mod server;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, CurrentSpeeds, Decimal2, Measurement, NewMeasurement, SpeedSample, SpeedTestInput};
pub use producer::{FixedProducer, MeasurementProducer, SimulatedProducer, SimulationRanges};
pub use service::SpeedTestService;
pub use store::{MeasurementStore, MemoryStore, SqliteStore};
pub use output::{OutputFormatter, ColoredFormatter, PlainFormatter, JsonFormatter, OutputFormatterFactory};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata recorded by build.rs
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");

/// One-line version banner used by `--debug`
pub fn build_info() -> String {
    format!("{} v{} ({} {}, built {})", PKG_NAME, VERSION, GIT_COMMIT, TARGET_TRIPLE, BUILD_TIME)
}

/// Default configuration values
pub mod defaults {
    use std::ops::Range;

    pub const DEFAULT_DATABASE_PATH: &str = "speed_test_results.db";
    pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
    pub const DEFAULT_SERVER_PORT: u16 = 2022;
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    // Ranges the simulated producer draws from
    pub const SIMULATED_DOWNLOAD_MBPS: Range<f64> = 10.0..110.0;
    pub const SIMULATED_UPLOAD_MBPS: Range<f64> = 5.0..55.0;
    pub const SIMULATED_PING_MS: Range<f64> = 10.0..60.0;
}
