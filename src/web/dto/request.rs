//! Request DTOs for Web API.

use serde::{Deserialize, Deserializer};

use crate::feed::EnrichOptions;

/// Accept any integer-looking limit; anything else means "use the default".
fn lenient_limit<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_limit))
}

/// Integers outside the `i64` range saturate so that they are still clamped.
fn parse_limit(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse() {
        return Some(n);
    }

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// `true`, `1`, `yes` and `on` (any case) enable a flag; anything else disables it.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.is_some_and(|s| {
        matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        )
    }))
}

/// Query parameters for the per-source and all-sources feed endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Maximum entries per source (clamped server side).
    #[serde(default, deserialize_with = "lenient_limit")]
    pub limit: Option<i64>,
    /// Scrape each entry's article page.
    #[serde(default, alias = "include_full_content", deserialize_with = "lenient_flag")]
    pub scrape: bool,
    /// Split scraped text into sentence groups.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub chunk_content: bool,
}

impl FeedQuery {
    /// Enrichment requested by these parameters.
    pub fn enrich_options(&self) -> EnrichOptions {
        EnrichOptions {
            scrape: self.scrape,
            chunk: self.scrape && self.chunk_content,
        }
    }
}

/// Query parameters for the latest endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct LatestQuery {
    #[serde(default, deserialize_with = "lenient_limit")]
    pub limit: Option<i64>,
}

/// Query parameters for the search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Search text. Required; checked by the handler so that a missing value
    /// gets the regular error body.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "lenient_limit")]
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_query_enrich_options() {
        let query = FeedQuery {
            limit: None,
            scrape: false,
            chunk_content: true,
        };
        assert_eq!(query.enrich_options(), EnrichOptions::default());

        let query = FeedQuery {
            limit: Some(5),
            scrape: true,
            chunk_content: true,
        };
        assert_eq!(query.enrich_options(), EnrichOptions::scrape_and_chunk());
    }

    #[test]
    fn test_feed_query_alias() {
        let query: FeedQuery =
            serde_json::from_str(r#"{"include_full_content": "True"}"#).unwrap();
        assert!(query.scrape);
        assert!(!query.chunk_content);
    }

    #[test]
    fn test_lenient_values() {
        let query: FeedQuery =
            serde_json::from_str(r#"{"limit": "abc", "scrape": "1", "chunk_content": "no"}"#)
                .unwrap();
        assert_eq!(query.limit, None);
        assert!(query.scrape);
        assert!(!query.chunk_content);

        let query: SearchQuery = serde_json::from_str(r#"{"q": "vàng", "limit": " 7 "}"#).unwrap();
        assert_eq!(query.q.as_deref(), Some("vàng"));
        assert_eq!(query.limit, Some(7));

        let query: LatestQuery = serde_json::from_str(r#"{"limit": "-4"}"#).unwrap();
        assert_eq!(query.limit, Some(-4));
    }

    #[test]
    fn test_out_of_range_limit_saturates() {
        assert_eq!(parse_limit("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_limit("+99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_limit("-99999999999999999999"), Some(i64::MIN));
        assert_eq!(parse_limit("9e99"), None);
        assert_eq!(parse_limit("-"), None);
        assert_eq!(parse_limit(""), None);
    }
}
