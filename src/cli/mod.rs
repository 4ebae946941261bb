//! Command-line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Speed Monitor - record and show internet speed test results
#[derive(Parser, Debug, Clone)]
#[command(name = "speedmon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides DATABASE_PATH)
    #[arg(long = "db", global = true, value_name = "PATH")]
    pub database: Option<String>,

    /// Force colored output
    #[arg(long, global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the most recent measurement
    Current,

    /// Run a simulated speed test and store the result
    Run,

    /// Save an externally measured result
    Save {
        /// Download speed in Mbps (must be greater than 0)
        #[arg(long, allow_negative_numbers = true)]
        download: f64,

        /// Upload speed in Mbps (must be greater than 0)
        #[arg(long, allow_negative_numbers = true)]
        upload: f64,

        /// Ping in milliseconds (must not be negative)
        #[arg(long, allow_negative_numbers = true)]
        ping: f64,
    },

    /// Start the HTTP API
    Serve {
        /// Address to bind (overrides SERVER_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides SERVER_PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Delete every stored measurement
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Write an example .env file
    InitEnv {
        /// Destination file
        #[arg(long, default_value = ".env.example")]
        path: PathBuf,
    },
}

impl Command {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Current => "current",
            Command::Run => "run",
            Command::Save { .. } => "save",
            Command::Serve { .. } => "serve",
            Command::Reset { .. } => "reset",
            Command::InitEnv { .. } => "init-env",
        }
    }
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Some(ref path) = self.database {
            if path.trim().is_empty() {
                return Err("--db cannot be empty".to_string());
            }
        }

        match &self.command {
            Command::Reset { yes: false } => {
                Err("Refusing to delete all measurements without --yes".to_string())
            }
            Command::Serve { port: Some(0), .. } => {
                Err("--port must be greater than 0".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Configuration Summary:\n");
        summary.push_str(&format!("  Command: {}\n", self.command.name()));
        if let Some(ref database) = self.database {
            summary.push_str(&format!("  Database: {}\n", database));
        }
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  JSON output: {}\n", self.json));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        summary
    }
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
