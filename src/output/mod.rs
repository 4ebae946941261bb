//! Output formatting and display system
//!
//! This module renders command results either as colored or plain text for
//! terminals, or as JSON for scripts.

mod colored;
mod formatter;
mod json;

pub use self::colored::{ColorScheme, ColoredFormatter};
pub use formatter::{
    format_last_updated, format_local_time, format_ping, format_speed, FormattingOptions, OutputFormatter,
    PlainFormatter, NO_DATA_MESSAGE,
};
pub use json::JsonFormatter;

use crate::{models::Config, types::OutputFormat};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            show_levels: true,
            verbose_mode: verbose,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create the formatter the configuration asks for
    pub fn from_config(config: &Config) -> Box<dyn OutputFormatter> {
        match config.output_format {
            OutputFormat::Json => Box::new(JsonFormatter::new(config.verbose)),
            OutputFormat::Text => Self::create_formatter(config.enable_color, config.verbose),
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}
