//! Cache key builders for all Farmgate cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Cache key for an API key validation outcome, by fingerprint.
///
/// The format is stable across process restarts: the same key material
/// always maps to the same cache key.
pub fn api_key(fingerprint: &str) -> String {
    format!("apikey_{fingerprint}")
}
