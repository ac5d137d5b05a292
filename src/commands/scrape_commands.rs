//! Commands that fetch or parse comparison pages

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use super::cli::{ParseArgs, PrintArgs, ScrapeArgs};
use crate::application::{PlanBatchUpdater, PlanScrapeService, ProviderOutcome};
use crate::domain::SupplierPlan;
use crate::infrastructure::{
    AppConfig, ComparePageFetcher, ContextualParser, HttpClient, PlanParseContext, PlanStore,
    SupplierPlanParser,
};

/// Build the live scrape service from configuration
pub fn build_scrape_service(config: &AppConfig) -> Result<PlanScrapeService<ComparePageFetcher>> {
    let parser = SupplierPlanParser::with_config(&config.parsing)
        .context("Failed to create supplier plan parser")?;
    let client = HttpClient::new(config.http.clone())?;
    let fetcher = ComparePageFetcher::new(client, &config.scraper.compare_url)?;
    Ok(PlanScrapeService::new(fetcher, Arc::new(parser)))
}

fn to_json(plans: &[SupplierPlan], compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(plans)
    } else {
        serde_json::to_string_pretty(plans)
    };
    json.context("Failed to serialize plans")
}

/// `scrape`: update the plan file of every provider
pub async fn scrape(config: &AppConfig, args: ScrapeArgs) -> Result<ExitCode> {
    let providers = if args.providers.is_empty() {
        config.scraper.providers.clone()
    } else {
        args.providers
    };
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.scraper.output_dir.clone());

    info!(
        "Updating {} providers into {}",
        providers.len(),
        output_dir.display()
    );
    let updater = PlanBatchUpdater::new(build_scrape_service(config)?, PlanStore::new(output_dir));
    let report = updater.run(&providers).await;

    for outcome in &report.outcomes {
        match outcome {
            ProviderOutcome::Written {
                provider,
                path,
                plan_count,
            } => println!("✅ {provider}: {plan_count} plans -> {}", path.display()),
            ProviderOutcome::Failed { provider, reason } => {
                println!("❌ {provider}: {reason}");
            }
        }
    }

    Ok(if report.all_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// `print`: scrape one provider and write its plans to stdout
pub async fn print(config: &AppConfig, args: PrintArgs) -> Result<ExitCode> {
    let service = build_scrape_service(config)?;
    match service.scrape(&args.provider).await {
        Some(plans) => {
            println!("{}", to_json(&plans, args.compact)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("Failed to fetch plans for {}", args.provider);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// `parse`: extract plans from a saved page
pub async fn parse(config: &AppConfig, args: ParseArgs) -> Result<ExitCode> {
    let html = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let parser = SupplierPlanParser::with_config(&config.parsing)
        .context("Failed to create supplier plan parser")?;

    let context = PlanParseContext {
        provider: None,
        source: Some(args.file.display().to_string()),
    };
    let document = scraper::Html::parse_document(&html);
    let plans = parser.parse_with_context(&document, &context)?;

    println!("{}", to_json(&plans, args.compact)?);
    Ok(ExitCode::SUCCESS)
}
