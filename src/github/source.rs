//! The remote collaborator contract consumed by the reconciliation driver.

use async_trait::async_trait;

use super::types::{Release, RepoMetadata};

/// Outcome of requesting one page of a release listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleasePage {
    /// The endpoint returned a JSON array.
    Releases {
        /// Elements that decoded as releases, in listing order.
        releases: Vec<Release>,
        /// Elements in the array, malformed ones included.
        listed: usize,
    },
    /// The endpoint answered, but the payload was not a list.
    NotAList,
    /// The endpoint was unreachable or refused after retries.
    NoData,
}

impl ReleasePage {
    /// A page where every listed element decoded.
    #[must_use]
    pub fn from_releases(releases: Vec<Release>) -> Self {
        let listed = releases.len();
        Self::Releases { releases, listed }
    }
}

/// Source of release listings and repository metadata.
///
/// Implementations absorb their own failures: every method returns a value,
/// never an error, so one broken repository cannot abort a run.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetches page `page` (1-indexed) of the release listing for `repo`.
    async fn release_page(&self, repo: &str, page: u32, per_page: u32) -> ReleasePage;

    /// Fetches owner and description for `repo`; the default value on failure.
    async fn repository_metadata(&self, repo: &str) -> RepoMetadata;

    /// Fetches the README text for `repo`, if it can be retrieved.
    async fn readme(&self, repo: &str) -> Option<String>;
}
