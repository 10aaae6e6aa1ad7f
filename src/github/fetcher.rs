//! Pagination over a repository's release listing.

use tracing::{debug, info, instrument};

use super::source::{ReleasePage, ReleaseSource};
use super::types::Release;

/// Releases requested per page (GitHub's maximum).
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Upper bound on pages fetched for one repository in deep mode.
pub const DEFAULT_MAX_PAGES: u32 = 10;

/// How far to walk a release listing.
///
/// # Cache short-circuit precondition
///
/// `stop_at_tag` assumes the listing is ordered newest first, which is how
/// GitHub returns releases. Everything at or after the cached tag is treated
/// as already known. If a source ever lists releases out of order, releases
/// published between two runs but listed after the cached tag are missed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions<'a> {
    /// Releases per page; a shorter page ends a deep scan.
    pub page_size: u32,
    /// Page limit for deep scans.
    pub max_pages: u32,
    /// Fetch every page rather than only the first.
    pub deep_scan: bool,
    /// Last tag seen on a previous run, if any.
    pub stop_at_tag: Option<&'a str>,
}

impl Default for FetchOptions<'_> {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            deep_scan: false,
            stop_at_tag: None,
        }
    }
}

/// Why pagination stopped. Reported in debug logs and to tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source had nothing to return.
    NoData,
    /// The payload was not a list.
    NotAList,
    /// A page came back empty.
    EmptyPage,
    /// A deep scan received fewer listed elements than the page size.
    ShortPage,
    /// Shallow mode fetched its single page.
    Shallow,
    /// The page limit was reached.
    PageLimit,
    /// The cached last-seen tag was found.
    CachedTag,
}

/// Releases gathered for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedReleases {
    /// Releases newer than the cached tag, in listing order.
    pub releases: Vec<Release>,
    /// Why the walk ended.
    pub stop_reason: StopReason,
    /// Number of page requests issued.
    pub pages_fetched: u32,
}

/// Collects releases for `repo` page by page until a stop condition holds.
///
/// Remote failure yields an empty list; it is never an error.
#[instrument(skip(source, options), fields(deep = options.deep_scan, cached = options.stop_at_tag))]
pub async fn fetch_releases(
    source: &dyn ReleaseSource,
    repo: &str,
    options: &FetchOptions<'_>,
) -> FetchedReleases {
    let mut releases = Vec::new();
    let mut page = 0u32;

    let stop_reason = loop {
        page += 1;

        // Malformed elements still count toward the page length.
        let (batch, listed) = match source.release_page(repo, page, options.page_size).await {
            ReleasePage::Releases { releases, listed } => (releases, listed),
            ReleasePage::NotAList => break StopReason::NotAList,
            ReleasePage::NoData => break StopReason::NoData,
        };

        if listed == 0 {
            break StopReason::EmptyPage;
        }

        if let Some(tag) = options.stop_at_tag
            && let Some(position) = batch.iter().position(|r| r.tag_name == tag)
        {
            releases.extend(batch.into_iter().take(position));
            break StopReason::CachedTag;
        }
        releases.extend(batch);

        if !options.deep_scan {
            break StopReason::Shallow;
        }
        if u32::try_from(listed).unwrap_or(u32::MAX) < options.page_size {
            break StopReason::ShortPage;
        }
        if page >= options.max_pages {
            info!(repo, max_pages = options.max_pages, "page limit reached");
            break StopReason::PageLimit;
        }
    };

    debug!(
        repo,
        releases = releases.len(),
        pages = page,
        ?stop_reason,
        "release listing fetched"
    );

    FetchedReleases {
        releases,
        stop_reason,
        pages_fetched: page,
    }
}
