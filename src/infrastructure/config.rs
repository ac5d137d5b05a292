//! Configuration infrastructure
//!
//! Settings are layered: built-in defaults (`serde(default)`), then an optional TOML/JSON file,
//! then `ENERGY_PLANS_*` environment variables (nested keys joined with
//! `__`, e.g. `ENERGY_PLANS_HTTP__TIMEOUT_SECONDS=10`). The merged result is
//! validated before use.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::domain::UtilityProvider;
use crate::infrastructure::http_client::HttpClientConfig;
use crate::infrastructure::parsing::ParsingConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    FileLoad {
        #[from]
        source: config::ConfigError,
    },

    #[error("Config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub http: HttpClientConfig,
    pub parsing: ParsingConfig,
    pub logging: LoggingConfig,
}

/// What to scrape and where to put it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Comparison page; the provider is sent as the `choice` query parameter
    pub compare_url: String,
    pub providers: Vec<UtilityProvider>,
    /// Directory receiving one `<Provider>.json` per provider
    pub output_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            compare_url: nh_ceps::COMPARE_URL.to_string(),
            providers: UtilityProvider::defaults(),
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output (stderr)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log directory; next to the executable when unset
    pub log_dir: Option<PathBuf>,

    /// Log file name prefix; files are `<prefix>.YYYY-MM-DD.log`
    pub file_prefix: String,

    /// Number of daily log files to keep (older files will be deleted)
    pub max_files: u32,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
            file_prefix: defaults::LOG_FILE_PREFIX.to_string(),
            max_files: defaults::MAX_LOG_FILES,
            module_filters: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or from the default file if present.
    ///
    /// An explicitly given file must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (file, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_config_file(), false),
        };
        if required && !file.exists() {
            return Err(ConfigError::NotFound { path: file });
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(file).required(required))
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scraper.providers")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// `config/default.toml` in the working directory, else the per-user file
    pub fn default_config_file() -> PathBuf {
        let local = PathBuf::from(defaults::CONFIG_FILE);
        if local.exists() {
            return local;
        }
        Self::user_config_file().unwrap_or(local)
    }

    /// `<user config dir>/energy-plans/config.toml`
    pub fn user_config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(defaults::APP_DIR_NAME)
                .join(defaults::USER_CONFIG_FILE)
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.scraper.compare_url).map_err(|e| {
            ConfigError::validation(format!(
                "scraper.compare_url '{}' is not a valid URL: {e}",
                self.scraper.compare_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::validation(
                "scraper.compare_url must use http or https",
            ));
        }

        if self.scraper.providers.is_empty() {
            return Err(ConfigError::validation("scraper.providers must not be empty"));
        }
        let mut seen = HashSet::new();
        for provider in &self.scraper.providers {
            if !seen.insert(provider.choice()) {
                return Err(ConfigError::validation(format!(
                    "scraper.providers lists '{provider}' more than once"
                )));
            }
        }

        if self.scraper.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::validation("scraper.output_dir must not be empty"));
        }

        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::validation("http.user_agent must not be empty"));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "http.timeout_seconds must be greater than 0",
            ));
        }
        if self.http.max_requests_per_second == 0 {
            return Err(ConfigError::validation(
                "http.max_requests_per_second must be greater than 0",
            ));
        }
        if self.http.retry.max_attempts == 0 {
            return Err(ConfigError::validation(
                "http.retry.max_attempts must be greater than 0",
            ));
        }
        if self.http.retry.base_delay_ms > self.http.retry.max_delay_ms {
            return Err(ConfigError::validation(
                "http.retry.base_delay_ms cannot be greater than max_delay_ms",
            ));
        }

        self.parsing
            .validate()
            .map_err(|e| ConfigError::validation(format!("parsing: {e}")))?;

        if self.logging.level.parse::<LevelFilter>().is_err() {
            return Err(ConfigError::validation(format!(
                "logging.level '{}' is not a log level",
                self.logging.level
            )));
        }
        if self.logging.file_output && self.logging.file_prefix.trim().is_empty() {
            return Err(ConfigError::validation("logging.file_prefix must not be empty"));
        }
        if !self.logging.console_output && !self.logging.file_output {
            return Err(ConfigError::validation(
                "logging needs console_output or file_output",
            ));
        }

        Ok(())
    }
}

/// Default values
pub mod defaults {
    pub const CONFIG_FILE: &str = "config/default.toml";

    pub const APP_DIR_NAME: &str = "energy-plans";
    pub const USER_CONFIG_FILE: &str = "config.toml";

    /// Environment variable prefix
    pub const ENV_PREFIX: &str = "ENERGY_PLANS";

    pub const OUTPUT_DIR: &str = "data";

    /// Browser user agent; the comparison site serves the same markup to any client
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const MAX_REQUESTS_PER_SECOND: u32 = 2;

    /// Default attempts per page, first one included
    pub const MAX_ATTEMPTS: u32 = 3;

    pub const RETRY_BASE_DELAY_MS: u64 = 1000;
    pub const RETRY_MAX_DELAY_MS: u64 = 10_000;
    pub const RETRY_JITTER_MS: u64 = 250;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_FILE_PREFIX: &str = "energy-plans";
    pub const MAX_LOG_FILES: u32 = 10;
}

/// New Hampshire Competitive Electric Power Supplier comparison site
pub mod nh_ceps {
    /// Residential plan comparison page
    pub const COMPARE_URL: &str =
        "https://www.energy.nh.gov/engyapps/ceps/ResidentialCompare.aspx";

    /// Class of the table holding one plan
    pub const PLAN_BLOCK_CLASS: &str = "tblCompareList";

    /// ASP.NET client ids are suffixed with the row index
    pub const PRICE_ID_PREFIX: &str = "MainContent_CompareSupplierID_lblKWh_";
    pub const LAST_UPDATE_ID_PREFIX: &str = "MainContent_CompareSupplierID_lblLastUpdate_";

    pub const SIGN_UP_LABEL: &str = "Sign Up for Supplier Plan";
}
