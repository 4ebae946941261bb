//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Quality classification for a measured value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedLevel {
    /// Download >= 100 Mbps, ping < 20 ms
    Excellent,
    /// Download >= 25 Mbps, ping < 50 ms
    Good,
    /// Download >= 10 Mbps, ping < 100 ms
    Fair,
    /// Anything slower
    Poor,
}

impl SpeedLevel {
    /// Classify a download speed in Mbps
    pub fn from_download_mbps(mbps: f64) -> Self {
        if mbps >= 100.0 {
            Self::Excellent
        } else if mbps >= 25.0 {
            Self::Good
        } else if mbps >= 10.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// Classify a ping in milliseconds (lower is better)
    pub fn from_ping_ms(ms: f64) -> Self {
        if ms < 20.0 {
            Self::Excellent
        } else if ms < 50.0 {
            Self::Good
        } else if ms < 100.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// Get descriptive text
    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text, colored when enabled
    #[default]
    Text,
    /// One JSON document per command
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(AppError::parse(format!("Invalid output format: {}", s))),
        }
    }
}
