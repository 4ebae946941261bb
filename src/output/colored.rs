//! Colored formatter implementation with terminal color support
//!
//! This module provides a rich colored output formatter that uses
//! ANSI colors and Unicode symbols for enhanced visual presentation.

use crate::{
    error::Result,
    models::{CurrentSpeeds, Measurement},
    types::SpeedLevel,
};
use super::formatter::{
    format_failed, format_last_updated, format_ping, format_speed, FormattingOptions, OutputFormatter,
    NO_DATA_MESSAGE,
};
use colored::*;
use std::fmt::Write as _;

impl SpeedLevel {
    /// Get color for this level
    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Red,
        }
    }

    /// Get Unicode symbol for this level
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Excellent => "🚀",
            Self::Good => "⚡",
            Self::Fair => "🔶",
            Self::Poor => "🔴",
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self { options, color_scheme }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Apply dimmed formatting if colors are enabled
    fn dimmed(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.dimmed()
        } else {
            text.normal()
        }
    }

    /// One labelled value, colored by its quality level
    fn value_line(&self, icon: &str, label: &str, value: &str, level: Option<SpeedLevel>) -> String {
        let label = format!("{:<10}", label);
        let value = format!("{:>12}", value);

        match level {
            Some(level) if self.options.show_levels => format!(
                "{} {}{}  {} {}",
                icon,
                self.bold(&label),
                self.colorize(&value, level.color()),
                level.symbol(),
                self.colorize(level.description(), level.color()),
            ),
            Some(level) => format!("{} {}{}", icon, self.bold(&label), self.colorize(&value, level.color())),
            None => format!("{} {}{}", icon, self.bold(&label), self.colorize(&value, self.color_scheme.info)),
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();

        let decorated_title = format!("📶 {}", title);
        let border = "═".repeat(decorated_title.chars().count() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(format_failed)?;
        writeln!(output, "  {}  ", self.bold(&decorated_title).color(self.color_scheme.header))
            .map_err(format_failed)?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(format_failed)?;

        Ok(output)
    }

    fn format_current_speeds(&self, speeds: &CurrentSpeeds) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", self.format_header("Current Speeds")?).map_err(format_failed)?;
        writeln!(output, "{}", self.value_line(
            "⬇️ ", "Download:", &format_speed(speeds.download_speed), Some(speeds.download_level()),
        )).map_err(format_failed)?;
        writeln!(output, "{}", self.value_line("⬆️ ", "Upload:", &format_speed(speeds.upload_speed), None))
            .map_err(format_failed)?;
        writeln!(output, "{}", self.value_line(
            "⏱️ ", "Ping:", &format_ping(speeds.ping), Some(speeds.ping_level()),
        )).map_err(format_failed)?;
        writeln!(output).map_err(format_failed)?;
        write!(output, "{}", self.dimmed(&format_last_updated(&speeds.last_updated))).map_err(format_failed)?;

        Ok(output)
    }

    fn format_measurement(&self, measurement: &Measurement) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", self.format_success(&format!("Stored speed test #{}", measurement.id))?)
            .map_err(format_failed)?;
        if self.options.verbose_mode {
            let details = format!(
                "Stored values: download={} upload={} ping={}",
                measurement.download_speed, measurement.upload_speed, measurement.ping
            );
            writeln!(output, "{}", self.colorize(&details, self.color_scheme.muted)).map_err(format_failed)?;
        }
        writeln!(output).map_err(format_failed)?;
        write!(output, "{}", self.format_current_speeds(&measurement.to_current_speeds())?).map_err(format_failed)?;

        Ok(output)
    }

    fn format_no_data(&self) -> Result<String> {
        Ok(format!(
            "📭 {}\n\n{}",
            self.colorize(NO_DATA_MESSAGE, self.color_scheme.warning),
            self.dimmed("Run 'speedmon run' to record the first measurement."),
        ))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("❌ {}", self.colorize(error, self.color_scheme.error)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("⚠️  {}", self.colorize(warning, self.color_scheme.warning)))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("✅ {}", self.colorize(message, self.color_scheme.success)))
    }
}

/// Helper functions for color management
impl ColoredFormatter {
    /// Check if terminal supports colors
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        std::env::var("TERM").map(|term| term != "dumb").unwrap_or(true)
    }

    /// Enable or disable colors at runtime
    pub fn set_colors_enabled(&mut self, enabled: bool) {
        self.options.enable_color = enabled && Self::supports_color();
    }
}
