//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation.

use crate::{
    error::{AppError, Result},
    models::{CurrentSpeeds, Measurement},
};
use chrono::{DateTime, Local, Utc};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the current speeds panel
    fn format_current_speeds(&self, speeds: &CurrentSpeeds) -> Result<String>;

    /// Format a freshly stored measurement
    fn format_measurement(&self, measurement: &Measurement) -> Result<String>;

    /// Format the empty state shown before any measurement exists
    fn format_no_data(&self) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Show the quality level next to each value
    pub show_levels: bool,
    /// Enable verbose mode with record details
    pub verbose_mode: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            show_levels: true,
            verbose_mode: false,
        }
    }
}

pub(super) fn format_failed(e: std::fmt::Error) -> AppError {
    AppError::io(format!("Failed to format output: {}", e))
}

/// Text shown when nothing has been measured yet
pub const NO_DATA_MESSAGE: &str = "No speed data available";

/// Speed in Mbps with one decimal
pub fn format_speed(mbps: f64) -> String {
    format!("{:.1} Mbps", mbps)
}

/// Ping in whole milliseconds
pub fn format_ping(ms: f64) -> String {
    format!("{:.0} ms", ms)
}

/// Timestamp in the local time zone
pub fn format_local_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Footer line under every speeds panel
pub fn format_last_updated(timestamp: &DateTime<Utc>) -> String {
    format!("Last updated: {}", format_local_time(timestamp))
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    fn value_line(&self, label: &str, value: &str, level: Option<&str>) -> String {
        match level {
            Some(level) if self.options.show_levels => format!("  {:<10}{:>12}  ({})", label, value, level),
            _ => format!("  {:<10}{:>12}", label, value),
        }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        Ok(format!("{}\n{}", title, "=".repeat(title.len())))
    }

    fn format_current_speeds(&self, speeds: &CurrentSpeeds) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", self.format_header("Current Speeds")?).map_err(format_failed)?;
        writeln!(output, "{}", self.value_line(
            "Download:", &format_speed(speeds.download_speed), Some(speeds.download_level().description()),
        )).map_err(format_failed)?;
        writeln!(output, "{}", self.value_line("Upload:", &format_speed(speeds.upload_speed), None)).map_err(format_failed)?;
        writeln!(output, "{}", self.value_line(
            "Ping:", &format_ping(speeds.ping), Some(speeds.ping_level().description()),
        )).map_err(format_failed)?;
        writeln!(output).map_err(format_failed)?;
        write!(output, "{}", format_last_updated(&speeds.last_updated)).map_err(format_failed)?;

        Ok(output)
    }

    fn format_measurement(&self, measurement: &Measurement) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", self.format_success(&format!("Stored speed test #{}", measurement.id))?).map_err(format_failed)?;
        if self.options.verbose_mode {
            writeln!(output, "Stored values: download={} upload={} ping={}",
                measurement.download_speed, measurement.upload_speed, measurement.ping).map_err(format_failed)?;
        }
        writeln!(output).map_err(format_failed)?;
        write!(output, "{}", self.format_current_speeds(&measurement.to_current_speeds())?).map_err(format_failed)?;

        Ok(output)
    }

    fn format_no_data(&self) -> Result<String> {
        Ok(format!("{}\n\nRun 'speedmon run' to record the first measurement.", NO_DATA_MESSAGE))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
