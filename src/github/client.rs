//! HTTP client for the GitHub REST API and raw content host.
//!
//! [`GitHubClient`] implements [`ReleaseSource`]. Every request goes through
//! [`retry_request`]; whatever survives the retry budget is logged and turned
//! into "no data" rather than an error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use super::error::FetchError;
use super::rate_limit::{quota_exhausted, wait_hint};
use super::retry::{RetryPolicy, retry_request};
use super::source::{ReleasePage, ReleaseSource};
use super::types::{Release, RepoMetadata, RepositoryResponse};
use crate::user_agent;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default base URL for raw repository files.
pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

/// Which host a request targets; decides the headers sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Api,
    Raw,
}

/// GitHub client with retry, rate-limit handling, and optional token auth.
///
/// Created once per run and reused for every repository so connections are
/// pooled.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    raw_base: String,
    token: Option<String>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_base", &self.api_base)
            .field("raw_base", &self.raw_base)
            .field("authenticated", &self.token.is_some())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Creates a client against the public GitHub hosts.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(token: Option<String>, policy: RetryPolicy) -> Result<Self, FetchError> {
        Self::with_base_urls(DEFAULT_API_BASE, DEFAULT_RAW_BASE, token, policy)
    }

    /// Creates a client with custom base URLs (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be built.
    pub fn with_base_urls(
        api_base: impl Into<String>,
        raw_base: impl Into<String>,
        token: Option<String>,
        policy: RetryPolicy,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .user_agent(user_agent::default_user_agent())
            .gzip(true)
            .build()
            .map_err(|source| FetchError::ClientBuild { source })?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            raw_base: raw_base.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            policy,
        })
    }

    /// Performs a GET with retries and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns the final [`FetchError`] once retries are exhausted or the
    /// failure is permanent.
    async fn get_text(&self, url: &str, endpoint: Endpoint) -> Result<String, FetchError> {
        retry_request(&self.policy, url, move || self.get_once(url, endpoint))
            .await
            .map_err(|(error, attempts)| {
                debug!(url, attempts, "request abandoned");
                error
            })
    }

    async fn get_once(&self, url: &str, endpoint: Endpoint) -> Result<String, FetchError> {
        let mut request = self.client.get(url);
        if endpoint == Endpoint::Api {
            request = request
                .header(ACCEPT, GITHUB_JSON)
                .header(API_VERSION_HEADER, API_VERSION);
        }
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| FetchError::invalid_url(url))?;
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers();
            if status == StatusCode::TOO_MANY_REQUESTS
                || (status == StatusCode::FORBIDDEN && quota_exhausted(headers))
            {
                return Err(FetchError::rate_limited(
                    url,
                    status.as_u16(),
                    wait_hint(headers),
                ));
            }
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })
    }
}

/// Decodes a release listing body into a [`ReleasePage`].
///
/// Elements that do not decode as a release are skipped with a warning.
pub(crate) fn parse_release_page(url: &str, body: &str) -> ReleasePage {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(url, error = %e, "release listing is not valid JSON");
            return ReleasePage::NotAList;
        }
    };

    let serde_json::Value::Array(items) = value else {
        debug!(url, "release listing payload is not a list");
        return ReleasePage::NotAList;
    };

    let listed = items.len();
    let releases = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Release>(item) {
            Ok(release) => Some(release),
            Err(e) => {
                warn!(url, index, error = %e, "skipping malformed release");
                None
            }
        })
        .collect();

    ReleasePage::Releases { releases, listed }
}

#[async_trait]
impl ReleaseSource for GitHubClient {
    #[instrument(skip(self), fields(source = "github"))]
    async fn release_page(&self, repo: &str, page: u32, per_page: u32) -> ReleasePage {
        let url = format!(
            "{}/repos/{repo}/releases?per_page={per_page}&page={page}",
            self.api_base
        );

        match self.get_text(&url, Endpoint::Api).await {
            Ok(body) => parse_release_page(&url, &body),
            Err(e) => {
                warn!(repo, page, error = %e, "release listing unavailable");
                ReleasePage::NoData
            }
        }
    }

    #[instrument(skip(self), fields(source = "github"))]
    async fn repository_metadata(&self, repo: &str) -> RepoMetadata {
        let url = format!("{}/repos/{repo}", self.api_base);

        let body = match self.get_text(&url, Endpoint::Api).await {
            Ok(body) => body,
            Err(e) => {
                warn!(repo, error = %e, "repository metadata unavailable");
                return RepoMetadata::default();
            }
        };

        match serde_json::from_str::<RepositoryResponse>(&body) {
            Ok(response) => response.into(),
            Err(e) => {
                let error = FetchError::invalid_body(&url, e.to_string());
                warn!(repo, error = %error, "repository metadata unreadable");
                RepoMetadata::default()
            }
        }
    }

    #[instrument(skip(self), fields(source = "github"))]
    async fn readme(&self, repo: &str) -> Option<String> {
        let url = format!("{}/{repo}/refs/heads/main/README.md", self.raw_base);

        match self.get_text(&url, Endpoint::Raw).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(repo, error = %e, "README unavailable");
                None
            }
        }
    }
}
