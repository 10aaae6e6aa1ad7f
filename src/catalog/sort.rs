//! Catalog ordering: most recently released app first.

use std::cmp::Reverse;

use chrono::{DateTime, FixedOffset, NaiveDate};

use super::model::{AppEntry, Catalog};

/// Parses a version date: an RFC 3339 timestamp, or a bare `YYYY-MM-DD`
/// date taken as midnight UTC.
fn parse_version_date(date: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(date) {
        return Some(timestamp);
    }
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset())
}

/// Returns the newest parseable version date of `app`, if any.
#[must_use]
pub fn latest_release_date(app: &AppEntry) -> Option<DateTime<FixedOffset>> {
    app.versions
        .iter()
        .filter_map(|v| parse_version_date(&v.date))
        .max()
}

/// Sorts apps by latest release date, descending.
///
/// Apps with no versions or no parseable dates sort last. The sort is
/// stable, so ties keep their current order.
pub fn sort_catalog(catalog: &mut Catalog) {
    // `None < Some(_)`, so reversing puts undated apps at the end.
    catalog
        .apps_mut()
        .sort_by_cached_key(|app| Reverse(latest_release_date(app)));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::VersionRecord;

    fn app(bundle: &str, dates: &[&str]) -> AppEntry {
        AppEntry {
            bundle_identifier: bundle.to_string(),
            versions: dates
                .iter()
                .map(|date| VersionRecord {
                    version: "1.0".to_string(),
                    date: (*date).to_string(),
                    ..VersionRecord::default()
                })
                .collect(),
            ..AppEntry::default()
        }
    }

    fn order(catalog: &Catalog) -> Vec<&str> {
        catalog
            .apps()
            .iter()
            .map(|a| a.bundle_identifier.as_str())
            .collect()
    }

    #[test]
    fn test_sort_by_latest_version_descending() {
        let mut catalog = Catalog::from_apps(vec![
            app("old", &["2023-01-01T00:00:00Z"]),
            app("new", &["2022-01-01T00:00:00Z", "2024-06-01T00:00:00Z"]),
            app("mid", &["2023-06-01T00:00:00Z"]),
        ]);

        sort_catalog(&mut catalog);

        assert_eq!(order(&catalog), ["new", "mid", "old"]);
    }

    #[test]
    fn test_apps_without_versions_sort_last() {
        let mut catalog = Catalog::from_apps(vec![
            app("empty", &[]),
            app("dated", &["2020-01-01T00:00:00Z"]),
            app("garbage", &["not a date"]),
        ]);

        sort_catalog(&mut catalog);

        assert_eq!(order(&catalog), ["dated", "empty", "garbage"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut catalog = Catalog::from_apps(vec![
            app("first", &["2024-01-01T00:00:00Z"]),
            app("second", &["2024-01-01T00:00:00Z"]),
            app("third", &["2024-01-01T00:00:00Z"]),
        ]);

        sort_catalog(&mut catalog);

        assert_eq!(order(&catalog), ["first", "second", "third"]);
    }

    #[test]
    fn test_offsets_compare_as_instants() {
        let mut catalog = Catalog::from_apps(vec![
            app("utc", &["2024-01-01T10:00:00Z"]),
            app("plus_two", &["2024-01-01T11:00:00+02:00"]),
        ]);

        sort_catalog(&mut catalog);

        // 11:00+02:00 is 09:00Z, earlier than 10:00Z.
        assert_eq!(order(&catalog), ["utc", "plus_two"]);
    }

    #[test]
    fn test_latest_release_date_ignores_unparseable() {
        let entry = app("x", &["bogus", "2024-02-01T00:00:00Z"]);
        let latest = latest_release_date(&entry).unwrap();
        assert_eq!(latest.to_rfc3339(), "2024-02-01T00:00:00+00:00");
    }

    #[test]
    fn test_date_only_versions_sort_with_timestamps() {
        let mut catalog = Catalog::from_apps(vec![
            app("empty", &[]),
            app("old", &["2023-01-01T00:00:00Z"]),
            app("curated", &["2024-06-01"]),
            app("newest", &["2024-06-01T12:00:00Z"]),
        ]);

        sort_catalog(&mut catalog);

        assert_eq!(order(&catalog), ["newest", "curated", "old", "empty"]);
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        let latest = latest_release_date(&app("x", &["2024-06-01"])).unwrap();
        assert_eq!(latest.to_rfc3339(), "2024-06-01T00:00:00+00:00");
    }
}
