//! Choosing the installable artifact of a release.

use crate::github::ReleaseAsset;

const INSTALLABLE_SUFFIX: &str = ".ipa";

/// Platform markers for non-iOS builds that share the `.ipa` suffix.
const EXCLUDED_PLATFORMS: [&str; 2] = ["visionos", "tvos"];

/// Returns true if `asset` is an iOS package this catalog can list.
#[must_use]
pub fn is_eligible(asset: &ReleaseAsset) -> bool {
    let name = asset.name.to_lowercase();
    let url = asset.browser_download_url.to_lowercase();

    url.ends_with(INSTALLABLE_SUFFIX)
        && !EXCLUDED_PLATFORMS
            .iter()
            .any(|platform| name.contains(platform) || url.contains(platform))
}

/// Picks at most one artifact from `assets`.
///
/// With a keyword, the first eligible artifact whose name or URL contains it
/// (case-insensitive) wins. Without one, or if nothing matches, the first
/// eligible artifact is used.
#[must_use]
pub fn select_asset<'a>(
    assets: &'a [ReleaseAsset],
    keyword: Option<&str>,
) -> Option<&'a ReleaseAsset> {
    let mut eligible = assets.iter().filter(|asset| is_eligible(asset));

    if let Some(keyword) = keyword.map(str::to_lowercase).filter(|k| !k.is_empty()) {
        let matched = eligible.clone().find(|asset| {
            asset.name.to_lowercase().contains(&keyword)
                || asset.browser_download_url.to_lowercase().contains(&keyword)
        });
        if matched.is_some() {
            return matched;
        }
    }

    eligible.next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> ReleaseAsset {
        ReleaseAsset {
            name: name.to_string(),
            browser_download_url: format!("https://github.com/o/r/releases/download/v1/{name}"),
            size: 1,
        }
    }

    fn names(assets: &[ReleaseAsset], keyword: Option<&str>) -> Option<String> {
        select_asset(assets, keyword).map(|a| a.name.clone())
    }

    // ==================== Eligibility Tests ====================

    #[test]
    fn test_only_ipa_urls_are_eligible() {
        assert!(is_eligible(&asset("App.ipa")));
        assert!(is_eligible(&asset("App.IPA")));
        assert!(!is_eligible(&asset("App.zip")));
        assert!(!is_eligible(&asset("App.ipa.sha256")));
    }

    #[test]
    fn test_other_platform_builds_are_excluded() {
        assert!(!is_eligible(&asset("App-visionOS.ipa")));
        assert!(!is_eligible(&asset("App_TVOS.ipa")));

        let tucked_in_url = ReleaseAsset {
            name: "App.ipa".to_string(),
            browser_download_url: "https://x/tvos/App.ipa".to_string(),
            size: 1,
        };
        assert!(!is_eligible(&tucked_in_url));
    }

    #[test]
    fn test_suffix_is_checked_on_url_not_name() {
        let renamed = ReleaseAsset {
            name: "App.ipa".to_string(),
            browser_download_url: "https://x/download?id=1".to_string(),
            size: 1,
        };
        assert!(!is_eligible(&renamed));
    }

    // ==================== Selection Tests ====================

    #[test]
    fn test_first_eligible_without_keyword() {
        let assets = [asset("notes.txt"), asset("A.ipa"), asset("B.ipa")];
        assert_eq!(names(&assets, None).as_deref(), Some("A.ipa"));
    }

    #[test]
    fn test_keyword_prefers_matching_asset() {
        let assets = [asset("App-Lite.ipa"), asset("App-Full.ipa")];
        assert_eq!(names(&assets, Some("full")).as_deref(), Some("App-Full.ipa"));
        assert_eq!(names(&assets, Some("FULL")).as_deref(), Some("App-Full.ipa"));
    }

    #[test]
    fn test_keyword_without_match_falls_back() {
        let assets = [asset("App-Lite.ipa"), asset("App-Full.ipa")];
        assert_eq!(names(&assets, Some("pro")).as_deref(), Some("App-Lite.ipa"));
    }

    #[test]
    fn test_keyword_never_selects_ineligible_asset() {
        let assets = [asset("App-Full-tvOS.ipa"), asset("App-Full.zip"), asset("App.ipa")];
        assert_eq!(names(&assets, Some("full")).as_deref(), Some("App.ipa"));
    }

    #[test]
    fn test_nothing_eligible_selects_nothing() {
        let assets = [asset("App.zip"), asset("App-visionos.ipa")];
        assert!(select_asset(&assets, None).is_none());
        assert!(select_asset(&[], Some("x")).is_none());
    }

    #[test]
    fn test_selection_is_deterministic() {
        let assets = [asset("b.ipa"), asset("a.ipa"), asset("c.ipa")];
        for _ in 0..5 {
            assert_eq!(names(&assets, Some("c")).as_deref(), Some("c.ipa"));
            assert_eq!(names(&assets, None).as_deref(), Some("b.ipa"));
        }
    }
}
