//! Measurement producers
//!
//! A producer originates the numbers for a new measurement. The service only
//! relies on the values being positive; it does not know how they were made.

use crate::{
    error::{AppError, Result},
    models::SpeedSample,
};
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Strategy that produces one candidate measurement
#[async_trait]
pub trait MeasurementProducer: Send + Sync {
    /// Produce one (download, upload, ping) sample
    async fn generate(&self) -> Result<SpeedSample>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Half-open ranges the simulation draws from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRanges {
    /// Download speed range in Mbps
    pub download_mbps: Range<f64>,
    /// Upload speed range in Mbps
    pub upload_mbps: Range<f64>,
    /// Ping range in milliseconds
    pub ping_ms: Range<f64>,
}

impl Default for SimulationRanges {
    fn default() -> Self {
        use crate::defaults::{SIMULATED_DOWNLOAD_MBPS, SIMULATED_PING_MS, SIMULATED_UPLOAD_MBPS};
        Self {
            download_mbps: SIMULATED_DOWNLOAD_MBPS,
            upload_mbps: SIMULATED_UPLOAD_MBPS,
            ping_ms: SIMULATED_PING_MS,
        }
    }
}

impl SimulationRanges {
    /// Check that every range is non-empty and yields positive values
    pub fn validate(&self) -> Result<()> {
        for (name, range) in [
            ("download_mbps", &self.download_mbps),
            ("upload_mbps", &self.upload_mbps),
            ("ping_ms", &self.ping_ms),
        ] {
            if !range.start.is_finite() || !range.end.is_finite() {
                return Err(AppError::config(format!("Simulation range {} must be finite", name)));
            }
            if range.start <= 0.0 {
                return Err(AppError::config(format!("Simulation range {} must start above 0", name)));
            }
            if range.start >= range.end {
                return Err(AppError::config(format!(
                    "Simulation range {} is empty ({}..{})",
                    name, range.start, range.end
                )));
            }
        }
        Ok(())
    }
}

/// Stand-in producer drawing uniformly random values
#[derive(Debug, Clone, Default)]
pub struct SimulatedProducer {
    ranges: SimulationRanges,
}

impl SimulatedProducer {
    /// Create a producer with the default ranges
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a producer with custom ranges
    pub fn with_ranges(ranges: SimulationRanges) -> Result<Self> {
        ranges.validate()?;
        Ok(Self { ranges })
    }

    pub fn ranges(&self) -> &SimulationRanges {
        &self.ranges
    }

    fn sample(&self) -> SpeedSample {
        let mut rng = rand::thread_rng();
        SpeedSample {
            download_mbps: rng.gen_range(self.ranges.download_mbps.clone()),
            upload_mbps: rng.gen_range(self.ranges.upload_mbps.clone()),
            ping_ms: rng.gen_range(self.ranges.ping_ms.clone()),
        }
    }
}

#[async_trait]
impl MeasurementProducer for SimulatedProducer {
    async fn generate(&self) -> Result<SpeedSample> {
        Ok(self.sample())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

/// Producer that always returns the same sample
#[derive(Debug, Clone)]
pub struct FixedProducer {
    sample: SpeedSample,
}

impl FixedProducer {
    pub fn new(download_mbps: f64, upload_mbps: f64, ping_ms: f64) -> Self {
        Self {
            sample: SpeedSample {
                download_mbps,
                upload_mbps,
                ping_ms,
            },
        }
    }
}

#[async_trait]
impl MeasurementProducer for FixedProducer {
    async fn generate(&self) -> Result<SpeedSample> {
        Ok(self.sample)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
