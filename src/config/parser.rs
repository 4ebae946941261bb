//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{Cli, Command},
    config::env::EnvManager,
    error::Result,
    models::Config,
    types::OutputFormat,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        // .env only fills variables the shell has not set
        EnvManager::load_env_file(self.cli.debug)?;

        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        Self::apply_overrides(&self.cli, config)
    }

    fn apply_overrides(cli: &Cli, config: &mut Config) {
        if let Some(ref database) = cli.database {
            config.database_path = database.clone();
        }

        if cli.color {
            config.enable_color = true;
        } else if cli.no_color || !cli.use_colors() {
            config.enable_color = false;
        }

        if cli.json {
            config.output_format = OutputFormat::Json;
        }

        // CLI-only flags
        config.verbose = cli.verbose;
        config.debug = cli.debug;

        if let Command::Serve { host, port } = &cli.command {
            if let Some(host) = host {
                config.server_host = host.clone();
            }
            if let Some(port) = port {
                config.server_port = *port;
            }
        }

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!("Final config: database={}, server={}:{}, enable_color={}",
                    config.database_path, config.server_host, config.server_port, config.enable_color);
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Database: {}", config.database_path));
    summary.push(format!("Server: {}:{}", config.server_host, config.server_port));
    summary.push(format!("Output Format: {:?}", config.output_format));
    summary.push(format!("Log Level: {}", config.log_level.as_deref().unwrap_or("(derived)")));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["speedmon", "--db", "override.db", "--no-color", "--json", "--verbose", "current"]);
        let mut config = Config::default();
        ConfigParser::apply_overrides(&cli, &mut config);

        assert_eq!(config.database_path, "override.db");
        assert!(!config.enable_color);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(config.verbose);
        assert!(!config.debug);
    }

    #[test]
    fn test_cli_overrides_env_values() {
        let cli = Cli::parse_from(["speedmon", "--color", "serve", "--port", "8080"]);
        let mut config = Config {
            server_host: "10.0.0.1".to_string(),
            server_port: 3000,
            enable_color: false,
            ..Default::default()
        };
        ConfigParser::apply_overrides(&cli, &mut config);

        // Host was not given on the command line, so the earlier layer stays
        assert_eq!(config.server_host, "10.0.0.1");
        assert_eq!(config.server_port, 8080);
        assert!(config.enable_color);
    }

    #[test]
    fn test_serve_options_ignored_for_other_commands() {
        let cli = Cli::parse_from(["speedmon", "run"]);
        let mut config = Config::default();
        ConfigParser::apply_overrides(&cli, &mut config);

        assert_eq!(config.server_port, crate::defaults::DEFAULT_SERVER_PORT);
        assert_eq!(config.database_path, crate::defaults::DEFAULT_DATABASE_PATH);
    }

    #[test]
    fn test_config_summary() {
        let config = Config::default();
        let summary = display_config_summary(&config);

        assert!(summary.contains("Database: speed_test_results.db"));
        assert!(summary.contains("Server: 127.0.0.1:2022"));
        assert!(summary.contains("Log Level: (derived)"));
    }
}
