//! Scrape configuration: the list of tracked repositories.
//!
//! `scraping.json` is a JSON array of objects:
//!
//! ```json
//! [
//!     {
//!         "github": "owner/app",
//!         "bundleID": "com.owner.app",
//!         "name": "App",
//!         "iconURL": "https://example.com/icon.png",
//!         "keyword": "full",
//!         "allowPrerelease": false,
//!         "deepScan": false,
//!         "enabled": true
//!     }
//! ]
//! ```
//!
//! Entries are validated one at a time by the driver so a single broken
//! entry fails only itself.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::persist::{self, StoreError};
use crate::release::ReleaseFilter;

/// Why a scrape configuration entry is unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is absent, null, or blank.
    #[error("entry {index}: missing required field `{field}`")]
    MissingField {
        /// Position in the configuration list.
        index: usize,
        /// JSON name of the field.
        field: &'static str,
    },

    /// The entry is not an object or a field has the wrong type.
    #[error("entry {index}: {reason}")]
    Malformed {
        /// Position in the configuration list.
        index: usize,
        /// Decoder message.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a missing-field error.
    #[must_use]
    pub fn missing_field(index: usize, field: &'static str) -> Self {
        Self::MissingField { index, field }
    }

    /// Creates a malformed-entry error.
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            index,
            reason: reason.into(),
        }
    }
}

/// A repository to reconcile, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedRepository {
    /// Remote identifier, `owner/name`.
    pub github: String,
    /// Catalog key.
    pub bundle_id: String,
    /// Display name for a newly created app.
    pub name: String,
    /// Icon for a newly created app; empty when unset.
    pub icon_url: String,
    /// Preferred artifact keyword, lowercased.
    pub keyword: Option<String>,
    pub allow_prerelease: bool,
    /// Walk every page instead of only the first.
    pub deep_scan: bool,
    pub enabled: bool,
}

impl TrackedRepository {
    /// Normalization rules for this repository.
    #[must_use]
    pub fn release_filter(&self) -> ReleaseFilter<'_> {
        ReleaseFilter {
            allow_prerelease: self.allow_prerelease,
            keyword: self.keyword.as_deref(),
        }
    }
}

/// One configuration entry as written, before validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawTrackedRepository(Value);

impl From<Value> for RawTrackedRepository {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryFields {
    github: Option<String>,
    #[serde(rename = "bundleID")]
    bundle_id: Option<String>,
    name: Option<String>,
    #[serde(rename = "iconURL")]
    icon_url: Option<String>,
    keyword: Option<String>,
    allow_prerelease: Option<bool>,
    deep_scan: Option<bool>,
    enabled: Option<bool>,
}

impl RawTrackedRepository {
    /// A name for log lines: the `github` field if readable, else the position.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        self.0
            .get("github")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| format!("entry #{index}"), str::to_string)
    }

    /// Checks required fields and applies defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the entry is malformed or a required field
    /// (`github`, `bundleID`, `name`) is missing.
    pub fn validate(&self, index: usize) -> Result<TrackedRepository, ConfigError> {
        let fields: EntryFields = serde_json::from_value(self.0.clone())
            .map_err(|e| ConfigError::malformed(index, e.to_string()))?;

        let required = |value: Option<String>, field| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::missing_field(index, field))
        };

        Ok(TrackedRepository {
            github: required(fields.github, "github")?,
            bundle_id: required(fields.bundle_id, "bundleID")?,
            name: required(fields.name, "name")?,
            icon_url: fields.icon_url.unwrap_or_default(),
            keyword: fields
                .keyword
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty()),
            allow_prerelease: fields.allow_prerelease.unwrap_or(false),
            deep_scan: fields.deep_scan.unwrap_or(false),
            enabled: fields.enabled.unwrap_or(true),
        })
    }
}

/// Loads the tracked repository list without validating entries.
///
/// # Errors
///
/// Returns [`StoreError`] if the file is missing, unreadable, or not a
/// JSON array.
pub fn load_tracked_repositories(path: &Path) -> Result<Vec<RawTrackedRepository>, StoreError> {
    let entries: Vec<RawTrackedRepository> = persist::read_json(path)?;
    debug!(path = %path.display(), entries = entries.len(), "scrape config loaded");
    Ok(entries)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn raw(value: Value) -> RawTrackedRepository {
        RawTrackedRepository::from(value)
    }

    #[test]
    fn test_validate_applies_defaults() {
        let repo = raw(json!({"github": "o/r", "bundleID": "com.o.r", "name": "R"}))
            .validate(0)
            .unwrap();

        assert_eq!(repo.github, "o/r");
        assert_eq!(repo.bundle_id, "com.o.r");
        assert_eq!(repo.icon_url, "");
        assert_eq!(repo.keyword, None);
        assert!(!repo.allow_prerelease);
        assert!(!repo.deep_scan);
        assert!(repo.enabled);
    }

    #[test]
    fn test_validate_reads_optional_fields() {
        let repo = raw(json!({
            "github": "o/r", "bundleID": "com.o.r", "name": "R",
            "iconURL": "https://x/icon.png", "keyword": " FuLL ",
            "allowPrerelease": true, "deepScan": true, "enabled": false
        }))
        .validate(0)
        .unwrap();

        assert_eq!(repo.icon_url, "https://x/icon.png");
        assert_eq!(repo.keyword.as_deref(), Some("full"));
        assert!(repo.allow_prerelease);
        assert!(repo.deep_scan);
        assert!(!repo.enabled);
        assert_eq!(repo.release_filter().keyword, Some("full"));
    }

    #[test]
    fn test_validate_reports_missing_field() {
        let err = raw(json!({"github": "o/r", "name": "R"})).validate(3).unwrap_err();
        assert_eq!(err, ConfigError::missing_field(3, "bundleID"));
        assert_eq!(err.to_string(), "entry 3: missing required field `bundleID`");
    }

    #[test]
    fn test_validate_treats_null_and_blank_as_missing() {
        let null = raw(json!({"github": null, "bundleID": "b", "name": "n"}));
        assert_eq!(null.validate(0).unwrap_err(), ConfigError::missing_field(0, "github"));

        let blank = raw(json!({"github": "o/r", "bundleID": "b", "name": "  "}));
        assert_eq!(blank.validate(0).unwrap_err(), ConfigError::missing_field(0, "name"));
    }

    #[test]
    fn test_validate_rejects_wrong_types() {
        let err = raw(json!({"github": "o/r", "bundleID": "b", "name": "n", "deepScan": "yes"}))
            .validate(1)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { index: 1, .. }));

        assert!(matches!(raw(json!(42)).validate(2), Err(ConfigError::Malformed { index: 2, .. })));
    }

    #[test]
    fn test_label_falls_back_to_index() {
        assert_eq!(raw(json!({"github": "o/r"})).label(0), "o/r");
        assert_eq!(raw(json!({"name": "x"})).label(4), "entry #4");
        assert_eq!(raw(json!("oops")).label(1), "entry #1");
    }

    #[test]
    fn test_load_keeps_invalid_entries_for_later_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scraping.json");
        fs::write(
            &path,
            r#"[{"github": "o/r", "bundleID": "b", "name": "n"}, {"github": "broken"}]"#,
        )
        .unwrap();

        let entries = load_tracked_repositories(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].validate(0).is_ok());
        assert!(entries[1].validate(1).is_err());
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_tracked_repositories(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
