//! HTTP client for the comparison page, with rate limiting and retries
//!
//! Sends browser-like requests, paces them with a token bucket and retries
//! transient failures with exponential backoff.

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, direct::NotKeyed},
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use super::config::defaults;
use super::fetch_error::{FetchError, FetchResult, is_retryable_status};
use super::retry_policy::RetryPolicy;
use crate::domain::UtilityProvider;

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub user_agent: String,
    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
    pub timeout_seconds: u64,
    pub max_requests_per_second: u32,
    pub follow_redirects: bool,
    pub retry: RetryPolicy,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let headers = [
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
            ("Accept-Language", "en-US,en;q=0.9"),
            ("Cache-Control", "no-cache"),
            ("Pragma", "no-cache"),
            ("Upgrade-Insecure-Requests", "1"),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            headers,
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_requests_per_second: defaults::MAX_REQUESTS_PER_SECOND,
            follow_redirects: true,
            retry: RetryPolicy::default(),
        }
    }
}

/// Source of raw comparison-page markup for a provider.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_plans_page(&self, provider: &UtilityProvider) -> FetchResult<String>;
}

/// Rate-limited HTTP client
pub struct HttpClient {
    client: Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name: {name}"))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for header {name}"))?;
            headers.insert(name, value);
        }

        // Accept-Encoding is left to reqwest so gzip/brotli bodies get decoded
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.max_requests_per_second)
                .context("Rate limit must be greater than 0")?,
        );

        Ok(Self {
            client,
            rate_limiter: RateLimiter::direct(quota),
            config,
        })
    }

    /// Fetch a URL as text, retrying transient failures per the retry policy
    pub async fn get_text(&self, url: &Url) -> FetchResult<String> {
        let policy = &self.config.retry;
        let mut attempt = 1;
        loop {
            match self.get_text_once(url, attempt).await {
                Ok(text) => return Ok(text),
                Err(e) if policy.should_retry(&e, attempt) => {
                    let delay = policy.delay_for(&e, attempt);
                    warn!(
                        "Attempt {}/{} failed for {}: {} (retrying in {:?})",
                        attempt, policy.max_attempts, url, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_text_once(&self, url: &Url, attempt: u32) -> FetchResult<String> {
        self.rate_limiter.until_ready().await;

        info!(
            "HTTP GET (attempt {}/{}): {}",
            attempt, self.config.retry.max_attempts, url
        );
        let started = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), started.elapsed(), e))?;

        let response = check_status(url, response)?;
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), started.elapsed(), e))?;

        if text.trim().is_empty() {
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }

        debug!("Fetched {} ({} chars in {:?})", url, text.len(), started.elapsed());
        Ok(text)
    }
}

fn check_status(url: &Url, response: Response) -> FetchResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Retry-After is only honoured for statuses we would retry anyway
    let retry_after = if is_retryable_status(status.as_u16()) {
        response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    } else {
        None
    };

    Err(FetchError::HttpStatus {
        status: status.as_u16(),
        url: url.to_string(),
        retry_after,
    })
}

/// Fetches the residential comparison page for a provider `choice`.
pub struct ComparePageFetcher {
    client: HttpClient,
    compare_url: Url,
}

impl ComparePageFetcher {
    pub fn new(client: HttpClient, compare_url: &str) -> FetchResult<Self> {
        let compare_url =
            Url::parse(compare_url).map_err(|e| FetchError::invalid_url(compare_url, e))?;
        Ok(Self {
            client,
            compare_url,
        })
    }

    /// Page URL for a provider, with `choice` replacing any existing value
    pub fn url_for(&self, provider: &UtilityProvider) -> Url {
        let mut url = self.compare_url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "choice")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("choice", provider.choice());
        url
    }
}

#[async_trait]
impl PageFetcher for ComparePageFetcher {
    async fn fetch_plans_page(&self, provider: &UtilityProvider) -> FetchResult<String> {
        let url = self.url_for(provider);
        self.client.get_text(&url).await
    }
}
