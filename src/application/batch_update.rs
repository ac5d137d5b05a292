//! Batch update of every configured provider
//!
//! Providers are processed one after another. A provider whose page cannot
//! be fetched is reported and skipped; its existing file is left untouched.

use std::path::PathBuf;

use tracing::{error, info};

use super::plan_scrape_service::PlanScrapeService;
use crate::domain::UtilityProvider;
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::plan_store::PlanStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    Written {
        provider: UtilityProvider,
        path: PathBuf,
        plan_count: usize,
    },
    Failed {
        provider: UtilityProvider,
        reason: String,
    },
}

impl ProviderOutcome {
    pub const fn provider(&self) -> &UtilityProvider {
        match self {
            Self::Written { provider, .. } | Self::Failed { provider, .. } => provider,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<ProviderOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// True when there was work to do and none of it succeeded
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.succeeded() == 0
    }
}

pub struct PlanBatchUpdater<F> {
    service: PlanScrapeService<F>,
    store: PlanStore,
}

impl<F: PageFetcher> PlanBatchUpdater<F> {
    pub fn new(service: PlanScrapeService<F>, store: PlanStore) -> Self {
        Self { service, store }
    }

    pub async fn run(&self, providers: &[UtilityProvider]) -> BatchReport {
        let mut report = BatchReport::default();
        for provider in providers {
            let outcome = self.update(provider).await;
            report.outcomes.push(outcome);
        }
        info!(
            "Batch finished: {} written, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }

    async fn update(&self, provider: &UtilityProvider) -> ProviderOutcome {
        let Some(plans) = self.service.scrape(provider).await else {
            error!("No data for {}; keeping any existing file", provider);
            return ProviderOutcome::Failed {
                provider: provider.clone(),
                reason: "page could not be fetched".to_string(),
            };
        };

        match self.store.write(provider, &plans).await {
            Ok(path) => {
                info!("Saved {} plans for {} to {}", plans.len(), provider, path.display());
                ProviderOutcome::Written {
                    provider: provider.clone(),
                    path,
                    plan_count: plans.len(),
                }
            }
            Err(e) => {
                error!("Saving plans for {} failed: {:#}", provider, e);
                ProviderOutcome::Failed {
                    provider: provider.clone(),
                    reason: format!("{e:#}"),
                }
            }
        }
    }
}
