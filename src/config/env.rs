//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::logging::LogLevel;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file if it exists; values already set in the environment win
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        format!(
            r#"# Speed Monitor Configuration
#
# Values in this file are used as defaults. Environment variables set in the
# shell take precedence, and command-line arguments override both.

# SQLite database file holding the measurements
# DATABASE_PATH={database}

# Address and port of the HTTP API (speedmon serve)
# SERVER_HOST={host}
# SERVER_PORT={port}

# Enable colored output (true/false)
# ENABLE_COLOR={color}

# Log level (trace, debug, info, warn, error, fatal)
# LOG_LEVEL=warn

# Example configurations for different scenarios:
#
# Expose the API to the local network:
# SERVER_HOST=0.0.0.0
#
# Keep the database next to other application data:
# DATABASE_PATH=/var/lib/speedmon/speed_test_results.db
"#,
            database = crate::defaults::DEFAULT_DATABASE_PATH,
            host = crate::defaults::DEFAULT_SERVER_HOST,
            port = crate::defaults::DEFAULT_SERVER_PORT,
            color = crate::defaults::DEFAULT_ENABLE_COLOR,
        )
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        use std::fs;

        let content = Self::create_example_env_content();
        fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "DATABASE_PATH" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("DATABASE_PATH cannot be empty"));
                }
            }
            "SERVER_HOST" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("SERVER_HOST cannot be empty"));
                }
            }
            "SERVER_PORT" => {
                let port: u16 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid SERVER_PORT value '{}': {}", value, e)))?;
                if port == 0 {
                    return Err(AppError::config("SERVER_PORT must be between 1 and 65535"));
                }
            }
            "ENABLE_COLOR" => {
                value.trim().parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            "LOG_LEVEL" => {
                value.trim().parse::<LogLevel>()
                    .map_err(|_| AppError::config(format!("Invalid LOG_LEVEL value '{}'", value)))?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("DATABASE_PATH", "SQLite database file", "speed_test_results.db"),
            ("SERVER_HOST", "Address the HTTP API binds to", "127.0.0.1"),
            ("SERVER_PORT", "Port the HTTP API listens on (1-65535)", "2022"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
            ("LOG_LEVEL", "Minimum log level written to stderr", "warn"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<15} {}\n", var, description));
            help.push_str(&format!("  {:<15} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        let mut warnings = Vec::new();

        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(var_name) {
                if let Err(e) = Self::validate_env_var(var_name, &value) {
                    warnings.push(format!("Warning: {}", e));
                }
            }
        }

        warnings
    }
}
