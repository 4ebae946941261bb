//! Main application orchestration and execution

use crate::{
    cli::{Cli, Command},
    config::{display_config_summary, load_config, EnvManager},
    error::{AppError, Result},
    logging::{LoggerFactory, OperationLogger},
    models::{Config, SpeedTestInput},
    output::{OutputFormatter, OutputFormatterFactory},
    producer::SimulatedProducer,
    server,
    service::SpeedTestService,
    store::{MeasurementStore, SqliteStore},
};
use std::sync::Arc;

/// Open the configured database and wire the service to it
pub fn build_service(config: &Config) -> Result<SpeedTestService> {
    let store = SqliteStore::open(config.database_path())?;
    Ok(SpeedTestService::new(Arc::new(store), Arc::new(SimulatedProducer::new())))
}

/// Main application struct that coordinates all components
pub struct App {
    config: Config,
    ops: OperationLogger,
    formatter: Box<dyn OutputFormatter>,
}

impl App {
    /// Create an application from an already resolved configuration
    pub async fn with_config(config: Config) -> Self {
        let factory = LoggerFactory::new(config.clone());
        let ops = factory.create_operation_logger().await;
        ops.logger().add_context_field("database".to_string(), &config.database_path).await;
        let formatter = OutputFormatterFactory::from_config(&config);
        Self { config, ops, formatter }
    }

    /// Resolve configuration from the command line and run the chosen command
    pub async fn run(cli: Cli) -> Result<()> {
        cli.validate().map_err(AppError::config)?;

        let config = load_config(cli.clone())?;
        if cli.color {
            colored::control::set_override(true);
        } else if !config.enable_color {
            colored::control::set_override(false);
        }

        if config.debug {
            eprintln!("{}", crate::build_info());
            eprintln!("{}", cli.get_config_summary());
            eprintln!("{}", display_config_summary(&config));
            for warning in EnvManager::validate_current_env() {
                eprintln!("{}", warning);
            }
        }

        let app = Self::with_config(config).await;
        let output = app.execute(&cli.command).await?;
        if !output.is_empty() {
            println!("{}", output);
        }
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute one command and return what should be printed
    pub async fn execute(&self, command: &Command) -> Result<String> {
        match command {
            Command::InitEnv { path } => {
                EnvManager::save_example_env_file(path)?;
                self.formatter.format_success(&format!("Wrote example configuration to {}", path.display()))
            }
            Command::Serve { .. } => {
                let service = build_service(&self.config)?;
                server::start_server(service, self.ops.clone(), &self.config).await?;
                Ok(String::new())
            }
            Command::Current => self.current(&build_service(&self.config)?).await,
            Command::Run => self.run_test(&build_service(&self.config)?).await,
            Command::Save { download, upload, ping } => {
                let input = SpeedTestInput::new(*download, *upload, *ping);
                self.save(&build_service(&self.config)?, input).await
            }
            Command::Reset { yes } => {
                if !yes {
                    return Err(AppError::config("Refusing to delete all measurements without --yes"));
                }
                self.reset(&build_service(&self.config)?).await
            }
        }
    }

    async fn current(&self, service: &SpeedTestService) -> Result<String> {
        let span = self.ops.start("get_current_speeds").await;
        match service.get_current_speeds().await {
            Ok(speeds) => {
                self.ops.completed(&span).await;
                self.formatter.format_current_speeds(&speeds)
            }
            // An empty store is the normal first-run state
            Err(e) if e.is_expected_empty() => {
                self.ops.failed(&span, &e).await;
                self.formatter.format_no_data()
            }
            Err(e) => {
                self.ops.failed(&span, &e).await;
                Err(e)
            }
        }
    }

    async fn run_test(&self, service: &SpeedTestService) -> Result<String> {
        let span = self.ops.start("run_speed_test").await;
        match service.run_speed_test().await {
            Ok(measurement) => {
                self.ops.measurement_recorded(&span, &measurement).await;
                self.formatter.format_measurement(&measurement)
            }
            Err(e) => {
                self.ops.failed(&span, &e).await;
                Err(e)
            }
        }
    }

    async fn save(&self, service: &SpeedTestService, input: SpeedTestInput) -> Result<String> {
        let span = self.ops.start("save_speed_test").await;
        match service.save_speed_test(input).await {
            Ok(measurement) => {
                self.ops.measurement_recorded(&span, &measurement).await;
                self.formatter.format_measurement(&measurement)
            }
            Err(e) => {
                self.ops.failed(&span, &e).await;
                Err(e)
            }
        }
    }

    async fn reset(&self, service: &SpeedTestService) -> Result<String> {
        let span = self.ops.start("reset").await;
        let store = Arc::clone(service.store());
        let outcome = tokio::task::spawn_blocking(move || -> Result<(u64, String)> {
            let removed = store.count()?;
            store.reset()?;
            Ok((removed, store.describe()))
        })
        .await?;

        match outcome {
            Ok((removed, location)) => {
                self.ops.completed(&span).await;
                self.formatter.format_success(&format!("Deleted {} measurements from {}", removed, location))
            }
            Err(e) => {
                self.ops.failed(&span, &e).await;
                Err(e)
            }
        }
    }
}
