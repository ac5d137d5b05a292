//! Plan scrape service
//!
//! Fetches one provider's comparison page and runs it through the parser.
//! Fetch failures end here: they are logged with their classification and
//! reported as "no data".

use std::sync::Arc;

use scraper::Html;
use tracing::{info, warn};

use crate::domain::{SupplierPlan, UtilityProvider};
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::parsing::{ContextualParser, PlanParseContext, SupplierPlanParser};

pub struct PlanScrapeService<F> {
    fetcher: F,
    parser: Arc<SupplierPlanParser>,
}

impl<F: PageFetcher> PlanScrapeService<F> {
    pub fn new(fetcher: F, parser: Arc<SupplierPlanParser>) -> Self {
        Self { fetcher, parser }
    }

    /// Plans currently offered for `provider`, or `None` when the page could
    /// not be fetched. A page without plan blocks yields `Some(vec![])`.
    pub async fn scrape(&self, provider: &UtilityProvider) -> Option<Vec<SupplierPlan>> {
        let html = match self.fetcher.fetch_plans_page(provider).await {
            Ok(html) => html,
            Err(e) => {
                warn!(
                    "Fetching plans for {} failed ({}): {}",
                    provider,
                    e.kind(),
                    e
                );
                return None;
            }
        };

        let plans = self.parse_page(&html, PlanParseContext::new(provider.clone(), "live"));
        if plans.is_empty() {
            info!("No plans found for {}", provider);
        } else {
            info!("Parsed {} plans for {}", plans.len(), provider);
        }
        Some(plans)
    }

    /// Run the parser over markup that was obtained some other way.
    pub fn parse_page(&self, html: &str, context: PlanParseContext) -> Vec<SupplierPlan> {
        let document = Html::parse_document(html);
        match self.parser.parse_with_context(&document, &context) {
            Ok(plans) => plans,
            Err(e) => {
                warn!("Plan parsing failed: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fetch_error::{FetchError, FetchResult};
    use async_trait::async_trait;

    struct StaticPage(Option<&'static str>);

    #[async_trait]
    impl PageFetcher for StaticPage {
        async fn fetch_plans_page(&self, provider: &UtilityProvider) -> FetchResult<String> {
            self.0.map(str::to_string).ok_or_else(|| FetchError::HttpStatus {
                status: 503,
                url: format!("https://example.com/?choice={provider}"),
                retry_after: None,
            })
        }
    }

    fn service(page: Option<&'static str>) -> PlanScrapeService<StaticPage> {
        PlanScrapeService::new(StaticPage(page), Arc::new(SupplierPlanParser::new().unwrap()))
    }

    #[tokio::test]
    async fn test_fetch_failure_is_none() {
        let provider = "Eversource".parse().unwrap();
        assert_eq!(service(None).scrape(&provider).await, None);
    }

    #[tokio::test]
    async fn test_page_without_plans_is_empty() {
        let provider = "Eversource".parse().unwrap();
        let plans = service(Some("<html><body>No suppliers</body></html>"))
            .scrape(&provider)
            .await;
        assert_eq!(plans, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_plans_are_parsed() {
        let provider = "Eversource".parse().unwrap();
        let page = r#"<table class="tblCompareList"><tr><td class="PlanName">Basic</td></tr></table>
                      <table class="tblCompareList"><tr><td class="PlanName">Green</td></tr></table>"#;
        let plans = service(Some(page)).scrape(&provider).await.unwrap();
        let names: Vec<_> = plans.iter().map(|p| p.plan_name.as_deref()).collect();
        assert_eq!(names, [Some("Basic"), Some("Green")]);
    }
}
