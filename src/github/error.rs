//! Error types for GitHub API requests.
//!
//! These never escape to the reconciliation driver: the client converts an
//! exhausted or permanent failure into "no data" after logging it.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while requesting a GitHub endpoint.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The server refused the request because the rate limit is exhausted.
    ///
    /// Covers HTTP 429 and GitHub's 403 with `x-ratelimit-remaining: 0`.
    #[error("rate limited (HTTP {status}) requesting {url}")]
    RateLimited {
        /// The URL that was rate limited.
        url: String,
        /// The HTTP status code (429 or 403).
        status: u16,
        /// Server-provided wait hint from `Retry-After` or `x-ratelimit-reset`.
        retry_after: Option<Duration>,
    },

    /// The response body could not be read or decoded.
    #[error("invalid response body from {url}: {reason}")]
    InvalidBody {
        /// The URL whose body was rejected.
        url: String,
        /// Why decoding failed.
        reason: String,
    },

    /// The request URL could not be built.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The HTTP client itself could not be constructed.
    #[error("HTTP client construction failed: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a rate-limit error with an optional server wait hint.
    pub fn rate_limited(
        url: impl Into<String>,
        status: u16,
        retry_after: Option<Duration>,
    ) -> Self {
        Self::RateLimited {
            url: url.into(),
            status,
            retry_after,
        }
    }

    /// Creates an invalid body error.
    pub fn invalid_body(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBody {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Returns the server wait hint carried by a rate-limit error.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
