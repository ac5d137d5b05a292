//! Application layer
//!
//! Orchestrates fetching, parsing and storing plans for one or many providers.

pub mod batch_update;
pub mod plan_scrape_service;

pub use batch_update::{BatchReport, PlanBatchUpdater, ProviderOutcome};
pub use plan_scrape_service::PlanScrapeService;
