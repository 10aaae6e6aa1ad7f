//! User-Agent string for GitHub traffic.
//!
//! GitHub rejects API requests without a User-Agent, and asks that it
//! identify the application making them.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/altstore-scraper";

/// Default User-Agent for API and raw-content requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("altstore-scraper/{version} (+{PROJECT_UA_URL})")
}
