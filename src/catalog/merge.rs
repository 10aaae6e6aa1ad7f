//! Merging freshly discovered versions into the catalog.
//!
//! An existing app only ever gains versions whose dedup key it has not seen;
//! nothing else about it changes. A missing app is created only when there
//! is at least one version to attach. Merging the same batch twice adds
//! nothing the second time.

use std::collections::HashSet;

use tracing::debug;

use super::model::{AppEntry, Catalog, VersionRecord};

/// Which fields decide that two version records are the same release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupStrategy {
    /// Version string only. A re-release under the same tag is ignored.
    Version,
    /// Version string plus publish date. A re-published tag is kept as a new record.
    #[default]
    VersionAndDate,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct DedupKey<'a> {
    version: &'a str,
    date: Option<&'a str>,
}

impl DedupStrategy {
    fn key(self, record: &VersionRecord) -> DedupKey<'_> {
        DedupKey {
            version: &record.version,
            date: match self {
                Self::Version => None,
                Self::VersionAndDate => Some(&record.date),
            },
        }
    }
}

/// What a merge did to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new app was appended with this many versions.
    Created { versions: usize },
    /// An existing app gained this many versions (possibly zero).
    Updated { added: usize },
    /// No app exists and there was nothing to create one from.
    Skipped,
}

/// Returns true when merging `versions` for `bundle_identifier` would create a new app.
///
/// The driver uses this to fetch repository metadata only when it is needed.
#[must_use]
pub fn creates_entry(
    catalog: &Catalog,
    bundle_identifier: &str,
    versions: &[VersionRecord],
) -> bool {
    !versions.is_empty() && !catalog.contains(bundle_identifier)
}

/// Merges `versions` into the app keyed by `bundle_identifier`.
///
/// `new_entry` supplies the app's descriptive fields when it must be
/// created; its `versions` and `bundle_identifier` are overwritten.
pub fn merge_versions(
    catalog: &mut Catalog,
    bundle_identifier: &str,
    versions: Vec<VersionRecord>,
    strategy: DedupStrategy,
    new_entry: impl FnOnce() -> AppEntry,
) -> MergeOutcome {
    if let Some(app) = catalog.find_mut(bundle_identifier) {
        let added = append_new_versions(&mut app.versions, versions, strategy);
        debug!(bundle_identifier, added, "merged into existing app");
        return MergeOutcome::Updated { added };
    }

    if versions.is_empty() {
        debug!(bundle_identifier, "no versions for untracked app; skipping");
        return MergeOutcome::Skipped;
    }

    let mut app = new_entry();
    app.bundle_identifier = bundle_identifier.to_string();
    app.versions.clear();
    let count = append_new_versions(&mut app.versions, versions, strategy);
    catalog.push(app);

    debug!(bundle_identifier, versions = count, "created app");
    MergeOutcome::Created { versions: count }
}

/// Appends every record whose key is not already present, in order.
fn append_new_versions(
    existing: &mut Vec<VersionRecord>,
    incoming: Vec<VersionRecord>,
    strategy: DedupStrategy,
) -> usize {
    let mut seen: HashSet<(String, Option<String>)> = existing
        .iter()
        .map(|record| owned_key(strategy, record))
        .collect();

    let before = existing.len();
    for record in incoming {
        if seen.insert(owned_key(strategy, &record)) {
            existing.push(record);
        }
    }
    existing.len() - before
}

fn owned_key(strategy: DedupStrategy, record: &VersionRecord) -> (String, Option<String>) {
    let key = strategy.key(record);
    (key.version.to_string(), key.date.map(str::to_string))
}
