//! Speed test measurement data models

use super::decimal::Decimal2;
use crate::types::SpeedLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded speed test result as persisted by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Identity assigned by the store on insert
    pub id: i64,

    /// Download speed in Mbps
    pub download_speed: Decimal2,

    /// Upload speed in Mbps
    pub upload_speed: Decimal2,

    /// Round-trip latency in milliseconds
    pub ping: Decimal2,

    /// When the measurement was recorded
    pub timestamp: DateTime<Utc>,
}

impl Measurement {
    pub fn download_mbps(&self) -> f64 {
        self.download_speed.to_f64()
    }

    pub fn upload_mbps(&self) -> f64 {
        self.upload_speed.to_f64()
    }

    pub fn ping_ms(&self) -> f64 {
        self.ping.to_f64()
    }

    /// View this measurement as the "current speeds" shown to clients
    pub fn to_current_speeds(&self) -> CurrentSpeeds {
        CurrentSpeeds {
            download_speed: self.download_mbps(),
            upload_speed: self.upload_mbps(),
            ping: self.ping_ms(),
            last_updated: self.timestamp,
        }
    }
}

/// A row waiting to be inserted; values are already normalized to two digits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewMeasurement {
    pub download_speed: Decimal2,
    pub upload_speed: Decimal2,
    pub ping: Decimal2,
    /// Explicit recording time; the store uses the current time when absent
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewMeasurement {
    /// Create a new measurement recorded at insertion time
    pub fn new(download_speed: Decimal2, upload_speed: Decimal2, ping: Decimal2) -> Self {
        Self {
            download_speed,
            upload_speed,
            ping,
            timestamp: None,
        }
    }

    /// Record the measurement at a specific time
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// The most recent measurement in the shape clients display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSpeeds {
    /// Download speed in Mbps
    pub download_speed: f64,
    /// Upload speed in Mbps
    pub upload_speed: f64,
    /// Ping in milliseconds
    pub ping: f64,
    /// Timestamp of the measurement these values come from
    pub last_updated: DateTime<Utc>,
}

impl CurrentSpeeds {
    /// Classify the download speed for display
    pub fn download_level(&self) -> SpeedLevel {
        SpeedLevel::from_download_mbps(self.download_speed)
    }

    /// Classify the ping for display
    pub fn ping_level(&self) -> SpeedLevel {
        SpeedLevel::from_ping_ms(self.ping)
    }
}

/// Externally supplied speed test result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedTestInput {
    /// Download speed in Mbps, must be greater than 0
    pub download_speed: f64,
    /// Upload speed in Mbps, must be greater than 0
    pub upload_speed: f64,
    /// Ping in milliseconds, must not be negative
    pub ping: f64,
}

impl SpeedTestInput {
    pub fn new(download_speed: f64, upload_speed: f64, ping: f64) -> Self {
        Self {
            download_speed,
            upload_speed,
            ping,
        }
    }
}

/// Raw values produced by a measurement producer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub ping_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_measurement() -> Measurement {
        Measurement {
            id: 7,
            download_speed: "30.75".parse().unwrap(),
            upload_speed: "6.50".parse().unwrap(),
            ping: "12.25".parse().unwrap(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_current_speeds_conversion() {
        let current = sample_measurement().to_current_speeds();

        assert_eq!(current.download_speed, 30.75);
        assert_eq!(current.upload_speed, 6.5);
        assert_eq!(current.ping, 12.25);
        assert_eq!(current.last_updated, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_measurement_serializes_numbers() {
        let json = serde_json::to_value(sample_measurement()).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["download_speed"], 30.75);
        assert_eq!(json["upload_speed"], 6.5);
        assert_eq!(json["ping"], 12.25);
        assert_eq!(json["timestamp"], "2024-01-01T12:00:00Z");
    }

    #[test]
    fn test_speed_test_input_from_json() {
        let input: SpeedTestInput =
            serde_json::from_str(r#"{"download_speed": 100.5, "upload_speed": 50.25, "ping": 0}"#).unwrap();

        assert_eq!(input, SpeedTestInput::new(100.5, 50.25, 0.0));
    }

    #[test]
    fn test_new_measurement_at() {
        let when = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let new = NewMeasurement::new(Decimal2::ZERO, Decimal2::ZERO, Decimal2::ZERO).at(when);
        assert_eq!(new.timestamp, Some(when));
    }
}
