//! GitHub access: release listings, repository metadata, and README text.
//!
//! # Architecture
//!
//! - [`ReleaseSource`] - Async trait the reconciliation driver consumes
//! - [`GitHubClient`] - REST implementation with retry and rate-limit handling
//! - [`fetch_releases`] - Pagination over a release listing
//! - [`RetryPolicy`] / [`classify_error`] - Backoff policy and retryable predicate
//!
//! # Example
//!
//! ```no_run
//! use scraper_core::github::{FetchOptions, GitHubClient, RetryPolicy, fetch_releases};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GitHubClient::new(None, RetryPolicy::default())?;
//! let fetched = fetch_releases(&client, "owner/app", &FetchOptions::default()).await;
//! println!("{} releases", fetched.releases.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod fetcher;
mod rate_limit;
mod retry;
mod source;
mod types;

pub use client::{DEFAULT_API_BASE, DEFAULT_RAW_BASE, GitHubClient};
pub use error::FetchError;
pub use fetcher::{
    DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, FetchOptions, FetchedReleases, StopReason,
    fetch_releases,
};
pub use rate_limit::{MAX_RETRY_AFTER, parse_rate_limit_reset, parse_retry_after};
pub use retry::{
    DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy, classify_error, retry_request,
};
pub use source::{ReleasePage, ReleaseSource};
pub use types::{Release, ReleaseAsset, RepoMetadata};
