//! Commands over saved plan files

use std::process::ExitCode;

use anyhow::{Context, Result};

use super::cli::ListArgs;
use super::display::render_table;
use crate::domain::plan_view::explore;
use crate::infrastructure::{AppConfig, PlanStore};
use crate::infrastructure::plan_store::read_raw_file;

/// `list`: filtered, sorted view of a provider's saved plans
pub async fn list(config: &AppConfig, args: ListArgs) -> Result<ExitCode> {
    let raw = match (&args.file, &args.provider) {
        (Some(path), _) => read_raw_file(path).await?,
        (None, Some(provider)) => {
            let dir = args
                .dir
                .clone()
                .unwrap_or_else(|| config.scraper.output_dir.clone());
            PlanStore::new(dir).read_raw(provider).await?
        }
        (None, None) => anyhow::bail!("Either a provider or --file is required"),
    };

    let plans = explore(&raw, &args.filter(), args.sort());

    if args.json {
        let json = serde_json::to_string_pretty(&plans).context("Failed to serialize plans")?;
        println!("{json}");
    } else {
        print!("{}", render_table(&plans));
    }
    Ok(ExitCode::SUCCESS)
}
