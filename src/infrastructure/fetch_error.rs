//! Fetch error types
//!
//! Failures of the single outbound page request, classified for diagnostics
//! and for the retry decision.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request timed out after {elapsed_ms}ms: {url}")]
    Timeout { url: String, elapsed_ms: u64 },

    #[error("HTTP request failed: {status} - {url}")]
    HttpStatus {
        status: u16,
        url: String,
        retry_after: Option<Duration>,
    },

    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Empty response body from {url}")]
    EmptyBody { url: String },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Coarse classification used in failure logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    Timeout,
    HttpStatus,
    Unknown,
}

impl fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Timeout => "timeout",
            Self::HttpStatus => "http-status",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

impl FetchError {
    pub fn invalid_url(url: &str, reason: impl fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Map a transport error, separating timeouts from everything else.
    pub fn from_reqwest(url: &str, elapsed: Duration, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                source,
            }
        }
    }

    pub const fn kind(&self) -> FetchFailureKind {
        match self {
            Self::Timeout { .. } => FetchFailureKind::Timeout,
            Self::HttpStatus { .. } => FetchFailureKind::HttpStatus,
            Self::Network { .. } | Self::EmptyBody { .. } | Self::InvalidUrl { .. } => {
                FetchFailureKind::Unknown
            }
        }
    }

    /// Check if another attempt could succeed
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::HttpStatus { status, .. } => is_retryable_status(*status),
            Self::EmptyBody { .. } | Self::InvalidUrl { .. } => false,
        }
    }

    /// Server-requested delay before the next attempt, if any
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::HttpStatus { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Statuses worth another attempt: 408, 429 and the transient 5xx family.
pub const fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

pub type FetchResult<T> = Result<T, FetchError>;
