//! Configuration data model and validation

use crate::logging::LogLevel;
use crate::types::{AppError, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file holding the measurements
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Address the HTTP API binds to
    #[serde(default = "default_server_host")]
    pub server_host: String,

    /// Port the HTTP API listens on
    #[serde(default = "default_server_port")]
    pub server_port: u16,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Output format for command results
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Explicit log level, overriding the verbose/debug derived one
    #[serde(default)]
    pub log_level: Option<String>,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            server_host: default_server_host(),
            server_port: default_server_port(),
            enable_color: default_enable_color(),
            output_format: OutputFormat::default(),
            log_level: None,
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Database location as a path
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
    }

    /// Socket address for the HTTP API; host names are resolved and IPv6
    /// literals may be given with or without brackets
    pub fn server_addr(&self) -> Result<SocketAddr> {
        let host = self.server_host.trim();
        let host = host
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(host);

        (host, self.server_port)
            .to_socket_addrs()
            .map_err(|e| AppError::config(format!("Invalid server host '{}': {}", self.server_host, e)))?
            .next()
            .ok_or_else(|| AppError::config(format!("Server host '{}' did not resolve to an address", self.server_host)))
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.database_path.trim().is_empty() {
            return Err(AppError::config("Database path cannot be empty"));
        }

        if self.server_host.trim().is_empty() {
            return Err(AppError::config("Server host cannot be empty"));
        }

        if self.server_port == 0 {
            return Err(AppError::config("Server port must be greater than 0"));
        }

        if let Some(level) = &self.log_level {
            level.parse::<LogLevel>()
                .map_err(|_| AppError::config(format!("Invalid log level: {}", level)))?;
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("DATABASE_PATH") {
            let path = path.trim();
            if !path.is_empty() {
                self.database_path = path.to_string();
            }
        }

        if let Ok(host) = std::env::var("SERVER_HOST") {
            let host = host.trim();
            if !host.is_empty() {
                self.server_host = host.to_string();
            }
        }

        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.server_port = port.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid SERVER_PORT value '{}': {}", port, e)))?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            let level = level.trim();
            if !level.is_empty() {
                self.log_level = Some(level.to_string());
            }
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_database_path() -> String {
    crate::defaults::DEFAULT_DATABASE_PATH.to_string()
}

fn default_server_host() -> String {
    crate::defaults::DEFAULT_SERVER_HOST.to_string()
}

fn default_server_port() -> u16 {
    crate::defaults::DEFAULT_SERVER_PORT
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
