use anyhow::Result;
use fitlens_functions::{config, logging, server};
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logging is not up yet, so startup failures go to stderr.
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let directives =
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());
    let filter = match logging::env_filter(&directives) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    logging::init(filter);

    info!(log_filter = %directives, "Starting FitLens functions server");

    server::run(config).await?;

    Ok(ExitCode::SUCCESS)
}
