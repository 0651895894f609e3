//! Feed data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{FetchError, FetchErrorKind};

/// A named feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Unique key used in routes and results.
    pub name: String,
    /// Feed document URL.
    pub url: String,
}

impl FeedSource {
    /// Create a new feed source.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Publication date of an entry.
///
/// Serialized as an RFC 3339 string when parsed, the raw text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PublishedAt {
    /// Machine-readable timestamp.
    Parsed(DateTime<Utc>),
    /// Date text the parsers did not understand (empty when the feed had none).
    Raw(String),
}

impl Default for PublishedAt {
    fn default() -> Self {
        PublishedAt::Raw(String::new())
    }
}

impl PublishedAt {
    /// The timestamp, if parsed.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            PublishedAt::Parsed(dt) => Some(*dt),
            PublishedAt::Raw(_) => None,
        }
    }
}

// Any parsed value is greater than any raw value, so a descending sort
// puts dated entries first.
impl Ord for PublishedAt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (PublishedAt::Parsed(a), PublishedAt::Parsed(b)) => a.cmp(b),
            (PublishedAt::Raw(a), PublishedAt::Raw(b)) => a.cmp(b),
            (PublishedAt::Parsed(_), PublishedAt::Raw(_)) => Ordering::Greater,
            (PublishedAt::Raw(_), PublishedAt::Parsed(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for PublishedAt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One article reference parsed from a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Entry {
    pub title: String,
    pub link: String,
    pub summary: String,
    /// Date text as it appeared in the feed.
    pub published: String,
    pub published_at: PublishedAt,
    pub author: String,
    pub category: String,
    /// Name of the source that produced this entry.
    pub source_name: String,
    /// Scraped article text. Only present when enrichment was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_content: Option<String>,
    /// Sentence groups of `full_content`. Only present when chunking was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_chunks: Option<Vec<String>>,
}

impl Entry {
    /// Return a copy of this entry carrying the scraped content.
    pub fn enriched(self, enrichment: Enrichment) -> Self {
        Self {
            full_content: Some(enrichment.full_content),
            content_chunks: enrichment.content_chunks,
            ..self
        }
    }

    /// Case-insensitive match against title or summary.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.summary.to_lowercase().contains(needle)
    }
}

/// Text extracted from an article page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub full_content: String,
    pub content_chunks: Option<Vec<String>>,
}

/// Enrichment requested for a fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichOptions {
    /// Scrape the linked article page.
    pub scrape: bool,
    /// Split scraped text into sentence groups. Ignored unless `scrape` is set.
    pub chunk: bool,
}

impl EnrichOptions {
    pub fn scrape() -> Self {
        Self {
            scrape: true,
            chunk: false,
        }
    }

    pub fn scrape_and_chunk() -> Self {
        Self {
            scrape: true,
            chunk: true,
        }
    }
}

/// Outcome of fetching a single source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceResult {
    pub source: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<Entry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FetchErrorKind>,
}

impl SourceResult {
    /// A successful fetch.
    pub fn succeeded(source: impl Into<String>, articles: Vec<Entry>) -> Self {
        Self {
            source: source.into(),
            success: true,
            count: Some(articles.len()),
            articles: Some(articles),
            error: None,
            error_kind: None,
        }
    }

    /// A failed fetch.
    pub fn failed(source: impl Into<String>, error: &FetchError) -> Self {
        Self {
            source: source.into(),
            success: false,
            count: None,
            articles: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
        }
    }

    /// Articles of a successful fetch, empty for a failed one.
    pub fn articles(&self) -> &[Entry] {
        self.articles.as_deref().unwrap_or_default()
    }
}

/// A source that could not be fetched while building a merged view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
    pub error_kind: FetchErrorKind,
}

impl SourceFailure {
    pub fn new(source: impl Into<String>, error: &FetchError) -> Self {
        Self {
            source: source.into(),
            error: error.to_string(),
            error_kind: error.kind(),
        }
    }
}

/// Entries from all sources, merged and ordered newest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergedResult {
    pub articles: Vec<Entry>,
    pub failures: Vec<SourceFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parsed(y: i32, m: u32, d: u32) -> PublishedAt {
        PublishedAt::Parsed(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_published_at_ordering() {
        assert!(parsed(2024, 1, 5) > parsed(2024, 1, 3));
        assert!(parsed(1970, 1, 1) > PublishedAt::Raw("zzz".to_string()));
        assert!(PublishedAt::Raw("b".to_string()) > PublishedAt::Raw("a".to_string()));
        assert!(PublishedAt::Raw("a".to_string()) > PublishedAt::default());
    }

    #[test]
    fn test_published_at_serialization() {
        assert_eq!(
            serde_json::to_value(parsed(2024, 1, 5)).unwrap(),
            serde_json::json!("2024-01-05T00:00:00Z")
        );
        assert_eq!(
            serde_json::to_value(PublishedAt::Raw("hôm qua".to_string())).unwrap(),
            serde_json::json!("hôm qua")
        );
    }

    #[test]
    fn test_entry_serialization_omits_enrichment() {
        let entry = Entry {
            title: "Title".to_string(),
            link: "https://example.com/a".to_string(),
            source_name: "example".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["title"], "Title");
        assert_eq!(json["published"], "");
        assert_eq!(json["published_at"], "");
        assert_eq!(json["source_name"], "example");
        assert!(json.get("full_content").is_none());
        assert!(json.get("content_chunks").is_none());
    }

    #[test]
    fn test_entry_enriched() {
        let entry = Entry {
            title: "Title".to_string(),
            ..Default::default()
        };

        let enriched = entry.clone().enriched(Enrichment {
            full_content: "Body.".to_string(),
            content_chunks: Some(vec!["Body.".to_string()]),
        });

        assert_eq!(enriched.title, "Title");
        assert_eq!(enriched.full_content.as_deref(), Some("Body."));
        assert_eq!(enriched.content_chunks, Some(vec!["Body.".to_string()]));
        // Original is untouched
        assert!(entry.full_content.is_none());
    }

    #[test]
    fn test_entry_matches() {
        let entry = Entry {
            title: "Chứng khoán tăng điểm".to_string(),
            summary: "VN-Index vượt mốc".to_string(),
            ..Default::default()
        };

        assert!(entry.matches("chứng khoán"));
        assert!(entry.matches("vn-index"));
        assert!(!entry.matches("bitcoin"));
    }

    #[test]
    fn test_source_result_serialization() {
        let ok = SourceResult::succeeded("a", vec![Entry::default()]);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 1);
        assert!(json.get("error").is_none());

        let failed = SourceResult::failed("b", &FetchError::Network("timeout".to_string()));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "network error: timeout");
        assert_eq!(json["error_kind"], "network");
        assert!(json.get("articles").is_none());
        assert!(failed.articles().is_empty());
    }
}
