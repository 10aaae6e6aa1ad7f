//! Catalog records in the AltStore source JSON format.
//!
//! Field names follow AltStore (`bundleIdentifier`, `downloadURL`, ...).
//! Keys this crate does not model are kept in `extra` and written back
//! unchanged, so hand-curated fields such as `tintColor` survive a run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::persist::null_as_default;

/// One installable release of an app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    /// Version string: the release tag without its leading `v`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    /// ISO-8601 publish timestamp, as reported by the release.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    /// Changelog text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub localized_description: String,
    #[serde(rename = "downloadURL", default, deserialize_with = "null_as_default")]
    pub download_url: String,
    /// Artifact size in bytes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One app in the catalog, keyed by bundle identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bundle_identifier: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub developer_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle: String,
    /// Long-form description (the repository README for scraped apps).
    #[serde(default, deserialize_with = "null_as_default")]
    pub localized_description: String,
    #[serde(rename = "iconURL", default, deserialize_with = "null_as_default")]
    pub icon_url: String,
    /// Known versions in insertion order; not necessarily chronological.
    #[serde(default, deserialize_with = "null_as_default")]
    pub versions: Vec<VersionRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The ordered collection of apps a run reconciles.
///
/// Order is derived: [`super::sort_catalog`] rewrites it every run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    apps: Vec<AppEntry>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing list of apps.
    #[must_use]
    pub fn from_apps(apps: Vec<AppEntry>) -> Self {
        Self { apps }
    }

    /// Returns the apps in their current order.
    #[must_use]
    pub fn apps(&self) -> &[AppEntry] {
        &self.apps
    }

    /// Consumes the catalog, returning its apps.
    #[must_use]
    pub fn into_apps(self) -> Vec<AppEntry> {
        self.apps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Looks up an app by bundle identifier.
    #[must_use]
    pub fn find(&self, bundle_identifier: &str) -> Option<&AppEntry> {
        self.apps
            .iter()
            .find(|app| app.bundle_identifier == bundle_identifier)
    }

    pub(crate) fn find_mut(&mut self, bundle_identifier: &str) -> Option<&mut AppEntry> {
        self.apps
            .iter_mut()
            .find(|app| app.bundle_identifier == bundle_identifier)
    }

    #[must_use]
    pub fn contains(&self, bundle_identifier: &str) -> bool {
        self.find(bundle_identifier).is_some()
    }

    /// Appends a new app. Callers guarantee the bundle identifier is unused.
    pub(crate) fn push(&mut self, app: AppEntry) {
        debug_assert!(!self.contains(&app.bundle_identifier));
        self.apps.push(app);
    }

    pub(crate) fn apps_mut(&mut self) -> &mut Vec<AppEntry> {
        &mut self.apps
    }

    /// Total number of version records across all apps.
    #[must_use]
    pub fn version_count(&self) -> usize {
        self.apps.iter().map(|app| app.versions.len()).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_entry_uses_altstore_field_names() {
        let app = AppEntry {
            name: "Demo".to_string(),
            bundle_identifier: "com.demo.app".to_string(),
            icon_url: "https://example.com/icon.png".to_string(),
            versions: vec![VersionRecord {
                version: "1.0".to_string(),
                download_url: "https://example.com/Demo.ipa".to_string(),
                size: 100,
                ..VersionRecord::default()
            }],
            ..AppEntry::default()
        };

        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json["bundleIdentifier"], "com.demo.app");
        assert_eq!(json["iconURL"], "https://example.com/icon.png");
        assert_eq!(json["developerName"], "");
        assert_eq!(json["versions"][0]["downloadURL"], "https://example.com/Demo.ipa");
        assert_eq!(json["versions"][0]["localizedDescription"], "");
        assert_eq!(json["versions"][0]["size"], 100);
    }

    #[test]
    fn test_app_entry_preserves_unknown_fields() {
        let json = serde_json::json!({
            "name": "Demo",
            "bundleIdentifier": "com.demo.app",
            "tintColor": "#ff0000",
            "versions": [{"version": "1.0", "minOSVersion": "15.0"}]
        });

        let app: AppEntry = serde_json::from_value(json).unwrap();
        assert_eq!(app.extra["tintColor"], "#ff0000");
        assert_eq!(app.versions[0].extra["minOSVersion"], "15.0");

        let back = serde_json::to_value(&app).unwrap();
        assert_eq!(back["tintColor"], "#ff0000");
        assert_eq!(back["versions"][0]["minOSVersion"], "15.0");
    }

    #[test]
    fn test_app_entry_loads_nulls_as_empty() {
        let json = serde_json::json!({
            "name": "Demo",
            "bundleIdentifier": "com.demo.app",
            "developerName": "dev",
            "subtitle": null,
            "localizedDescription": null,
            "versions": [{"version": "1.0", "date": "2024-01-01T00:00:00Z",
                          "localizedDescription": null, "downloadURL": "u", "size": null}]
        });

        let app: AppEntry = serde_json::from_value(json).unwrap();
        assert_eq!(app.subtitle, "");
        assert_eq!(app.versions[0].localized_description, "");
        assert_eq!(app.versions[0].size, 0);
        assert!(app.extra.is_empty());
    }

    #[test]
    fn test_catalog_lookup_by_bundle_identifier() {
        let catalog = Catalog::from_apps(vec![
            AppEntry {
                bundle_identifier: "a".to_string(),
                ..AppEntry::default()
            },
            AppEntry {
                bundle_identifier: "b".to_string(),
                versions: vec![VersionRecord::default(), VersionRecord::default()],
                ..AppEntry::default()
            },
        ]);

        assert!(catalog.contains("b"));
        assert!(!catalog.contains("c"));
        assert_eq!(catalog.find("b").unwrap().versions.len(), 2);
        assert_eq!(catalog.version_count(), 2);
        assert_eq!(catalog.len(), 2);
    }
}
