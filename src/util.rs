//! Utility functions for general-purpose use across the application.

use chrono::{DateTime, Utc};

/// Prepend `https://` when the URL carries neither an `http://` nor an `https://` scheme.
///
/// # Examples
///
/// ```
/// use rustlink::util::normalize_url;
///
/// assert_eq!(normalize_url("example.com"), "https://example.com");
/// assert_eq!(normalize_url("http://example.com"), "http://example.com");
/// ```
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Calculate the number of whole seconds from `now` until `expires_at`.
///
/// Returns 0 when `expires_at` is not in the future, so the result is always a
/// valid cache TTL that cannot outlive the record.
///
/// # Examples
///
/// ```
/// use rustlink::util::seconds_until;
/// use chrono::{Duration, Utc};
///
/// let now = Utc::now();
/// assert_eq!(seconds_until(now + Duration::days(1), now), 86_400);
/// assert_eq!(seconds_until(now - Duration::days(1), now), 0);
/// ```
pub fn seconds_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let seconds = expires_at.signed_duration_since(now).num_seconds();
    u64::try_from(seconds).unwrap_or(0)
}

/// Compose the public short URL for a code
pub fn short_url(base_url: &str, short_code: &str) -> String {
    format!("{}/{}", base_url, short_code)
}
