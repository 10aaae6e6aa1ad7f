//! GitHub REST API wire types.
//!
//! Only the fields the scraper reads are modelled. Absent or `null` fields
//! fall back to defaults so one sparse release cannot poison a page.

use serde::Deserialize;

use crate::persist::null_as_default;

/// A release from `GET /repos/{owner}/{repo}/releases`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Tag name (e.g. `"v1.2.0"`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag_name: String,
    /// ISO-8601 publish timestamp; absent for unpublished drafts.
    #[serde(default)]
    pub published_at: Option<String>,
    /// Release notes body.
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub draft: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prerelease: bool,
    /// Attached downloadable files.
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<ReleaseAsset>,
}

/// A single downloadable file attached to a release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    /// File name (e.g. `"MyApp.ipa"`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Direct download URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub browser_download_url: String,
    /// Size in bytes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
}

/// Repository metadata used when a new app entry is created.
///
/// The default value (empty strings) stands in when the lookup fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoMetadata {
    /// Owner login, used as the developer name.
    pub owner_login: String,
    /// Repository description, used as the subtitle.
    pub description: String,
}

/// Raw shape of `GET /repos/{owner}/{repo}`.
#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryResponse {
    #[serde(default)]
    pub owner: Option<OwnerResponse>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnerResponse {
    #[serde(default)]
    pub login: Option<String>,
}

impl From<RepositoryResponse> for RepoMetadata {
    fn from(response: RepositoryResponse) -> Self {
        Self {
            owner_login: response
                .owner
                .and_then(|owner| owner.login)
                .unwrap_or_default(),
            description: response.description.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_release_deserializes_github_shape() {
        let json = serde_json::json!({
            "tag_name": "v1.0",
            "published_at": "2024-03-01T12:00:00Z",
            "body": "Fixes",
            "draft": false,
            "prerelease": true,
            "html_url": "https://github.com/o/r/releases/tag/v1.0",
            "assets": [{
                "name": "App.ipa",
                "browser_download_url": "https://github.com/o/r/releases/download/v1.0/App.ipa",
                "size": 1024,
                "content_type": "application/octet-stream"
            }]
        });

        let release: Release = serde_json::from_value(json).unwrap();
        assert_eq!(release.tag_name, "v1.0");
        assert_eq!(release.published_at.as_deref(), Some("2024-03-01T12:00:00Z"));
        assert!(release.prerelease);
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].size, 1024);
    }

    #[test]
    fn test_release_tolerates_nulls_and_missing_fields() {
        let json = serde_json::json!({
            "tag_name": "2.0",
            "published_at": null,
            "body": null,
            "assets": null
        });

        let release: Release = serde_json::from_value(json).unwrap();
        assert_eq!(release.published_at, None);
        assert_eq!(release.body, None);
        assert!(!release.draft);
        assert!(release.assets.is_empty());
    }

    #[test]
    fn test_repo_metadata_from_response() {
        let response: RepositoryResponse = serde_json::from_value(serde_json::json!({
            "owner": {"login": "octocat"},
            "description": null
        }))
        .unwrap();

        let metadata = RepoMetadata::from(response);
        assert_eq!(metadata.owner_login, "octocat");
        assert_eq!(metadata.description, "");
    }
}
