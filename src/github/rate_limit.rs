//! Parsing of server-provided rate-limit wait hints.
//!
//! GitHub signals rate limiting two ways: a standard `Retry-After` header
//! (secondary limits) and `x-ratelimit-reset` carrying the epoch second at
//! which the primary quota refills. Both are capped at [`MAX_RETRY_AFTER`].

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::header::{HeaderMap, RETRY_AFTER};
use tracing::{debug, instrument, warn};

/// Longest server-mandated wait honored before retrying (5 minutes).
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(300);

/// Header carrying the number of requests left in the current window.
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Header carrying the epoch second at which the window resets.
pub const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// Parses a Retry-After header value into a Duration.
///
/// Supports integer seconds (`Retry-After: 120`) and HTTP-dates
/// (`Retry-After: Wed, 21 Oct 2025 07:28:00 GMT`). A date in the past yields
/// zero. Returns `None` when the value cannot be parsed.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use scraper_core::github::parse_retry_after;
///
/// assert_eq!(parse_retry_after("120"), Some(Duration::from_secs(120)));
/// assert_eq!(parse_retry_after("invalid"), None);
/// ```
#[must_use]
#[instrument]
pub fn parse_retry_after(header_value: &str) -> Option<Duration> {
    let header_value = header_value.trim();

    if let Ok(seconds) = header_value.parse::<i64>() {
        if seconds < 0 {
            debug!(seconds, "negative Retry-After value, ignoring");
            return None;
        }
        #[allow(clippy::cast_sign_loss)]
        return Some(cap(Duration::from_secs(seconds as u64)));
    }

    if let Ok(datetime) = httpdate::parse_http_date(header_value) {
        let until = datetime
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO);
        Some(cap(until))
    } else {
        debug!(header_value, "unparseable Retry-After value");
        None
    }
}

/// Parses an `x-ratelimit-reset` epoch-seconds value into a wait duration.
///
/// A reset time in the past yields zero.
#[must_use]
pub fn parse_rate_limit_reset(header_value: &str) -> Option<Duration> {
    let reset_epoch = header_value.trim().parse::<u64>().ok()?;
    let now_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    Some(cap(Duration::from_secs(
        reset_epoch.saturating_sub(now_epoch),
    )))
}

/// Returns true when GitHub reports the primary quota as used up.
#[must_use]
pub fn quota_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0")
}

/// Extracts the best available wait hint from response headers.
///
/// `Retry-After` wins over `x-ratelimit-reset`.
#[must_use]
pub fn wait_hint(headers: &HeaderMap) -> Option<Duration> {
    let header = |name| headers.get(name).and_then(|v| v.to_str().ok());
    header(RETRY_AFTER.as_str())
        .and_then(parse_retry_after)
        .or_else(|| header(RATE_LIMIT_RESET).and_then(parse_rate_limit_reset))
}

fn cap(duration: Duration) -> Duration {
    if duration > MAX_RETRY_AFTER {
        warn!(
            delay_secs = duration.as_secs(),
            max_secs = MAX_RETRY_AFTER.as_secs(),
            "rate-limit wait exceeds maximum, capping"
        );
        MAX_RETRY_AFTER
    } else {
        duration
    }
}
