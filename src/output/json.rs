//! JSON formatter for scripting
//!
//! Each command prints one JSON document. Field names match the HTTP API.

use crate::{
    error::Result,
    models::{CurrentSpeeds, Measurement},
};
use super::formatter::{OutputFormatter, NO_DATA_MESSAGE};
use serde_json::json;

/// Formatter producing machine-readable JSON
#[derive(Debug, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, value: &serde_json::Value) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_header(&self, _title: &str) -> Result<String> {
        Ok(String::new())
    }

    fn format_current_speeds(&self, speeds: &CurrentSpeeds) -> Result<String> {
        self.render(&serde_json::to_value(speeds)?)
    }

    fn format_measurement(&self, measurement: &Measurement) -> Result<String> {
        self.render(&serde_json::to_value(measurement)?)
    }

    fn format_no_data(&self) -> Result<String> {
        self.render(&json!({ "error": NO_DATA_MESSAGE, "kind": "no_data" }))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        self.render(&json!({ "error": error }))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        self.render(&json!({ "warning": warning }))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        self.render(&json!({ "status": "ok", "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    #[test]
    fn test_current_speeds_json() {
        let speeds = CurrentSpeeds {
            download_speed: 30.75,
            upload_speed: 6.5,
            ping: 12.25,
            last_updated: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        };
        let output = JsonFormatter::new(false).format_current_speeds(&speeds).unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["download_speed"], 30.75);
        assert_eq!(json["upload_speed"], 6.5);
        assert_eq!(json["ping"], 12.25);
        assert!(json["last_updated"].as_str().unwrap().starts_with("2024-01-01T12:00:00"));
    }

    #[test]
    fn test_measurement_json_keeps_precision() {
        let measurement = Measurement {
            id: 4,
            download_speed: "123.46".parse().unwrap(),
            upload_speed: "67.89".parse().unwrap(),
            ping: "0.00".parse().unwrap(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        };
        let output = JsonFormatter::new(true).format_measurement(&measurement).unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["id"], 4);
        assert_eq!(json["download_speed"], 123.46);
        assert_eq!(json["ping"], 0.0);
    }

    #[test]
    fn test_no_data_json() {
        let output = JsonFormatter::default().format_no_data().unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["kind"], "no_data");
        assert_eq!(json["error"], NO_DATA_MESSAGE);
    }

    #[test]
    fn test_header_is_empty() {
        assert!(JsonFormatter::default().format_header("ignored").unwrap().is_empty());
    }
}
