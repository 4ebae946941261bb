//! Speed Monitor - Main CLI Application
//!
//! Shows the most recent speed test result, records new ones and serves
//! them over HTTP.

use clap::Parser;
use speed_monitor::{app::App, cli::Cli, error::AppError};
use std::process;

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue with the command you ran.");
        process::exit(99);
    }));

    let cli = Cli::parse();
    let use_color = cli.use_colors();
    let json = cli.json;

    if let Err(e) = App::run(cli).await {
        if json {
            let body = serde_json::json!({
                "error": e.to_string(),
                "kind": e.category().to_lowercase(),
                "field": e.field(),
            });
            println!("{}", body);
        } else {
            eprintln!("{}", e.format_for_console(use_color));
        }

        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format (speedmon init-env writes an example)");
            eprintln!("  - SERVER_PORT must be between 1 and 65535");
            eprintln!("  - LOG_LEVEL must be one of trace, debug, info, warn, error, fatal");
        }
        AppError::Validation { .. } => {
            eprintln!();
            eprintln!("Input help:");
            eprintln!("  - Download and upload speeds must be greater than 0");
            eprintln!("  - Ping must not be negative");
            eprintln!("  - Values are stored with two decimal places, up to 999999.99");
        }
        AppError::Storage(_) => {
            eprintln!();
            eprintln!("Storage troubleshooting:");
            eprintln!("  - Check that the database directory exists and is writable");
            eprintln!("  - Use --db or DATABASE_PATH to point at another file");
            eprintln!("  - Make sure no other process holds a long write lock");
        }
        AppError::Server(_) => {
            eprintln!();
            eprintln!("Server troubleshooting:");
            eprintln!("  - Choose a free port with --port or SERVER_PORT");
            eprintln!("  - Binding to ports below 1024 may need elevated privileges");
        }
        _ => {}
    }
}
