//! Turning a GitHub release into a catalog version record.

use std::fmt;

use tracing::debug;

use super::selector::select_asset;
use crate::catalog::VersionRecord;
use crate::github::Release;

/// Per-repository rules applied while normalizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseFilter<'a> {
    /// Keep prereleases.
    pub allow_prerelease: bool,
    /// Preferred artifact keyword.
    pub keyword: Option<&'a str>,
}

/// Why a release produced no version record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Draft,
    Prerelease,
    /// No publish timestamp.
    Unpublished,
    NoInstallableAsset,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Draft => "draft release",
            Self::Prerelease => "prerelease not allowed",
            Self::Unpublished => "release has no publish date",
            Self::NoInstallableAsset => "no installable asset",
        };
        f.write_str(reason)
    }
}

/// Strips a single leading `v` from a tag.
#[must_use]
pub fn version_from_tag(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// Normalizes one release, or says why it was rejected.
///
/// # Errors
///
/// Returns the first [`Rejection`] that applies, checked in the order
/// draft, prerelease, publish date, installable asset.
pub fn normalize_release(
    release: &Release,
    filter: ReleaseFilter<'_>,
) -> Result<VersionRecord, Rejection> {
    if release.draft {
        return Err(Rejection::Draft);
    }
    if release.prerelease && !filter.allow_prerelease {
        return Err(Rejection::Prerelease);
    }
    let Some(date) = release.published_at.as_deref() else {
        return Err(Rejection::Unpublished);
    };
    let asset = select_asset(&release.assets, filter.keyword).ok_or(Rejection::NoInstallableAsset)?;

    Ok(VersionRecord {
        version: version_from_tag(&release.tag_name).to_string(),
        date: date.to_string(),
        localized_description: release.body.clone().unwrap_or_default(),
        download_url: asset.browser_download_url.clone(),
        size: asset.size,
        ..VersionRecord::default()
    })
}

/// Normalizes a batch, keeping listing order and logging each rejection.
#[must_use]
pub fn normalize_releases(
    repo: &str,
    releases: &[Release],
    filter: ReleaseFilter<'_>,
) -> Vec<VersionRecord> {
    releases
        .iter()
        .filter_map(|release| match normalize_release(release, filter) {
            Ok(record) => Some(record),
            Err(reason) => {
                debug!(repo, tag = %release.tag_name, %reason, "release skipped");
                None
            }
        })
        .collect()
}
