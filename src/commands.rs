//! Command-line commands
//!
//! Each command group is its own file in the commands/ directory; `cli`
//! holds the argument definitions shared by the binary.

pub mod cli;
pub mod display;
pub mod explore_commands;
pub mod scrape_commands;

pub use cli::{Cli, Command};

use std::process::ExitCode;

use anyhow::Result;

use crate::infrastructure::AppConfig;

/// Dispatch a parsed command line against a loaded configuration.
pub async fn run(cli: Cli, config: AppConfig) -> Result<ExitCode> {
    match cli.command {
        Command::Scrape(args) => scrape_commands::scrape(&config, args).await,
        Command::Print(args) => scrape_commands::print(&config, args).await,
        Command::Parse(args) => scrape_commands::parse(&config, args).await,
        Command::List(args) => explore_commands::list(&config, args).await,
    }
}
