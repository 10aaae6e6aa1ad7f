//! Reconciliation driver.
//!
//! Walks the tracked repositories in order. For each one it fetches releases,
//! normalizes them, merges the result into the catalog, and advances the
//! release cache. Repositories never share state except through the
//! [`SyncState`] accumulator handed from one step to the next, and a broken
//! repository only ever fails itself.

use std::fmt;

use tracing::{error, info, instrument, warn};

use crate::cache::ReleaseCache;
use crate::catalog::{
    AppEntry, Catalog, DedupStrategy, MergeOutcome, creates_entry, merge_versions, sort_catalog,
};
use crate::config::{ConfigError, RawTrackedRepository, TrackedRepository};
use crate::github::{
    DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, FetchOptions, ReleaseSource, fetch_releases,
};
use crate::release::{normalize_release, normalize_releases};

/// Knobs for a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Releases requested per page.
    pub page_size: u32,
    /// Page limit for deep scans.
    pub max_pages: u32,
    /// How versions are deduplicated.
    pub dedup: DedupStrategy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            dedup: DedupStrategy::default(),
        }
    }
}

/// What happened to one tracked repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    /// A new app was added with this many versions.
    Created { versions: usize },
    /// An existing app gained this many versions.
    Updated { added: usize },
    /// An existing app had nothing new.
    Unchanged,
    /// No app exists yet and no eligible release was found.
    Skipped,
    /// The entry is switched off.
    Disabled,
    /// The configuration entry is unusable.
    Failed(ConfigError),
}

impl fmt::Display for RepoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { versions } => write!(f, "created with {versions} version(s)"),
            Self::Updated { added } => write!(f, "added {added} version(s)"),
            Self::Unchanged => f.write_str("up to date"),
            Self::Skipped => f.write_str("skipped: no eligible release"),
            Self::Disabled => f.write_str("disabled"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

impl From<MergeOutcome> for RepoOutcome {
    fn from(outcome: MergeOutcome) -> Self {
        match outcome {
            MergeOutcome::Created { versions } => Self::Created { versions },
            MergeOutcome::Updated { added: 0 } => Self::Unchanged,
            MergeOutcome::Updated { added } => Self::Updated { added },
            MergeOutcome::Skipped => Self::Skipped,
        }
    }
}

/// Outcome for one configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReport {
    /// The `github` field, or the entry position when unreadable.
    pub repo: String,
    pub outcome: RepoOutcome,
}

/// State carried from one repository to the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncState {
    pub catalog: Catalog,
    /// Present only when the run is cache-aware.
    pub cache: Option<ReleaseCache>,
}

/// Counts per outcome kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub disabled: usize,
    pub failed: usize,
    /// Versions appended across all apps, including those on new apps.
    pub versions_added: usize,
}

/// Result of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// The sorted catalog.
    pub catalog: Catalog,
    pub cache: Option<ReleaseCache>,
    /// One report per configuration entry, in configuration order.
    pub outcomes: Vec<RepoReport>,
}

impl SyncReport {
    /// Tallies the outcomes.
    #[must_use]
    pub fn summary(&self) -> SyncSummary {
        let mut summary = SyncSummary::default();
        for report in &self.outcomes {
            match &report.outcome {
                RepoOutcome::Created { versions } => {
                    summary.created += 1;
                    summary.versions_added += versions;
                }
                RepoOutcome::Updated { added } => {
                    summary.updated += 1;
                    summary.versions_added += added;
                }
                RepoOutcome::Unchanged => summary.unchanged += 1,
                RepoOutcome::Skipped => summary.skipped += 1,
                RepoOutcome::Disabled => summary.disabled += 1,
                RepoOutcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Reconciles every entry against `source` and returns the sorted catalog.
///
/// Never fails: remote problems read as "nothing new" and a bad entry is
/// reported as [`RepoOutcome::Failed`].
pub async fn reconcile(
    source: &dyn ReleaseSource,
    entries: &[RawTrackedRepository],
    catalog: Catalog,
    cache: Option<ReleaseCache>,
    options: &SyncOptions,
) -> SyncReport {
    let mut state = SyncState { catalog, cache };
    let mut outcomes = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let label = entry.label(index);
        let (next, outcome) = reconcile_entry(source, entry, index, &label, state, options).await;
        state = next;
        outcomes.push(RepoReport {
            repo: label,
            outcome,
        });
    }

    sort_catalog(&mut state.catalog);

    SyncReport {
        catalog: state.catalog,
        cache: state.cache,
        outcomes,
    }
}

#[instrument(name = "repo", skip_all, fields(repo = %label))]
async fn reconcile_entry(
    source: &dyn ReleaseSource,
    entry: &RawTrackedRepository,
    index: usize,
    label: &str,
    state: SyncState,
    options: &SyncOptions,
) -> (SyncState, RepoOutcome) {
    let repo = match entry.validate(index) {
        Ok(repo) => repo,
        Err(e) => {
            error!(error = %e, "invalid scrape entry");
            return (state, RepoOutcome::Failed(e));
        }
    };

    if !repo.enabled {
        info!("repository disabled; skipping");
        return (state, RepoOutcome::Disabled);
    }

    reconcile_repository(source, &repo, state, options).await
}

async fn reconcile_repository(
    source: &dyn ReleaseSource,
    repo: &TrackedRepository,
    mut state: SyncState,
    options: &SyncOptions,
) -> (SyncState, RepoOutcome) {
    let fetch_options = FetchOptions {
        page_size: options.page_size,
        max_pages: options.max_pages,
        deep_scan: repo.deep_scan,
        stop_at_tag: state.cache.as_ref().and_then(|c| c.last_seen(&repo.github)),
    };
    let fetched = fetch_releases(source, &repo.github, &fetch_options).await;

    let filter = repo.release_filter();
    // Only accepted tags are cached; a rejected release may gain its .ipa later.
    let newest_tag = fetched
        .releases
        .iter()
        .find(|r| !r.tag_name.is_empty() && normalize_release(r, filter).is_ok())
        .map(|r| r.tag_name.clone());
    let versions = normalize_releases(&repo.github, &fetched.releases, filter);

    let new_entry = if creates_entry(&state.catalog, &repo.bundle_id, &versions) {
        Some(describe_new_app(source, repo).await)
    } else {
        None
    };

    let merged = merge_versions(
        &mut state.catalog,
        &repo.bundle_id,
        versions,
        options.dedup,
        || new_entry.unwrap_or_default(),
    );

    if let Some(cache) = state.cache.as_mut()
        && let Some(tag) = newest_tag
    {
        cache.record(repo.github.as_str(), tag);
    }

    let outcome = RepoOutcome::from(merged);
    match &outcome {
        RepoOutcome::Skipped => {
            info!(bundle_id = %repo.bundle_id, "no eligible release; app not created");
        }
        outcome => info!(bundle_id = %repo.bundle_id, %outcome, "repository reconciled"),
    }
    (state, outcome)
}

/// Builds the descriptive fields of an app that is about to be created.
async fn describe_new_app(source: &dyn ReleaseSource, repo: &TrackedRepository) -> AppEntry {
    let metadata = source.repository_metadata(&repo.github).await;
    let readme = source.readme(&repo.github).await.unwrap_or_else(|| {
        warn!(repo = %repo.github, "no README; description left empty");
        String::new()
    });

    AppEntry {
        name: repo.name.clone(),
        bundle_identifier: repo.bundle_id.clone(),
        developer_name: metadata.owner_login,
        subtitle: metadata.description,
        localized_description: readme,
        icon_url: repo.icon_url.clone(),
        ..AppEntry::default()
    }
}
