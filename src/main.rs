use std::process::ExitCode;

use clap::Parser;
use energy_plan_scraper::commands::{self, Cli};
use energy_plan_scraper::infrastructure::{AppConfig, init_logging_with_config};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }

    if let Err(e) = init_logging_with_config(&config.logging) {
        eprintln!("Failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    match commands::run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
