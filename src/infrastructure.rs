//! Infrastructure layer
//!
//! Contains external concerns: the HTTP fetch path, HTML parsing, the plan
//! file store, configuration and logging.

pub mod config;
pub mod fetch_error;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod plan_store;
pub mod retry_policy;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, LoggingConfig, ScraperConfig};
pub use fetch_error::{FetchError, FetchFailureKind, FetchResult};
pub use http_client::{ComparePageFetcher, HttpClient, HttpClientConfig, PageFetcher};
pub use logging::init_logging_with_config;
pub use parsing::{ContextualParser, ParsingConfig, PlanParseContext, SupplierPlanParser};
pub use parsing_error::{ParsingError, ParsingResult};
pub use plan_store::PlanStore;
pub use retry_policy::RetryPolicy;
