//! Last-seen release tag per repository.
//!
//! With a cache, a run stops paginating as soon as it reaches the tag it saw
//! last time. The file is a flat JSON object, `{"owner/repo": "v1.2.0"}`,
//! written with keys sorted.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::persist::{self, StoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseCache {
    tags: BTreeMap<String, String>,
}

impl ReleaseCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the cache. A missing file is an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but is unreadable or not a
    /// string-to-string object.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let Some(tags) = persist::read_json_if_exists::<BTreeMap<String, String>>(path)? else {
            info!(path = %path.display(), "release cache not found; starting empty");
            return Ok(Self::default());
        };
        debug!(path = %path.display(), entries = tags.len(), "release cache loaded");
        Ok(Self { tags })
    }

    /// Writes the cache.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        persist::write_json(path, &self.tags)
    }

    /// The last tag seen for `repo`.
    #[must_use]
    pub fn last_seen(&self, repo: &str) -> Option<&str> {
        self.tags.get(repo).map(String::as_str)
    }

    /// Records `tag` as the newest seen for `repo`.
    pub fn record(&mut self, repo: impl Into<String>, tag: impl Into<String>) {
        self.tags.insert(repo.into(), tag.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_is_empty_cache() {
        let dir = TempDir::new().unwrap();
        let cache = ReleaseCache::load(&dir.path().join("cache.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_record_overwrites_previous_tag() {
        let mut cache = ReleaseCache::new();
        cache.record("o/r", "v1");
        cache.record("o/r", "v2");

        assert_eq!(cache.last_seen("o/r"), Some("v2"));
        assert_eq!(cache.last_seen("o/other"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_save_writes_sorted_keys_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let mut cache = ReleaseCache::new();
        cache.record("z/z", "v9");
        cache.record("a/a", "v1");

        cache.save(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n    \"a/a\": \"v1\",\n    \"z/z\": \"v9\"\n}\n"
        );
        assert_eq!(ReleaseCache::load(&path).unwrap(), cache);
    }

    #[test]
    fn test_load_rejects_non_string_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, r#"{"o/r": 3}"#).unwrap();

        assert!(matches!(ReleaseCache::load(&path), Err(StoreError::Json { .. })));
    }
}
