//! Feed retrieval and entry normalization.

use std::sync::Arc;

use feed_rs::parser;
use tracing::{debug, instrument};

use super::dates::{parse_date, scan_raw_dates};
use super::normalize::normalize;
use super::types::{Entry, FeedSource, PublishedAt};
use crate::error::FetchError;
use crate::http::HttpClient;

/// Fetches a feed source and turns it into normalized entries.
pub struct FeedFetcher {
    client: Arc<dyn HttpClient>,
    max_entries: usize,
}

impl FeedFetcher {
    /// Create a fetcher keeping at most `max_entries` entries per feed.
    pub fn new(client: Arc<dyn HttpClient>, max_entries: usize) -> Self {
        Self {
            client,
            max_entries,
        }
    }

    /// Fetch and parse one source.
    #[instrument(skip_all, fields(source = %source.name))]
    pub async fn fetch(&self, source: &FeedSource) -> Result<Vec<Entry>, FetchError> {
        let body = self.client.get(&source.url).await?;
        let entries = parse_entries(&body, &source.name, self.max_entries)?;
        debug!(count = entries.len(), "Parsed feed");
        Ok(entries)
    }
}

/// Parse a feed document into at most `max_entries` entries, in document order.
pub fn parse_entries(
    document: &[u8],
    source_name: &str,
    max_entries: usize,
) -> Result<Vec<Entry>, FetchError> {
    let feed = parser::parse(document).map_err(|e| FetchError::Parse(e.to_string()))?;
    let raw_dates = scan_raw_dates(document);

    let entries = feed
        .entries
        .into_iter()
        .take(max_entries)
        .enumerate()
        .map(|(i, entry)| {
            let raw_date = raw_dates.get(i).cloned().unwrap_or_default();
            let parsed = entry
                .published
                .or(entry.updated)
                .or_else(|| parse_date(&raw_date));

            let published = match (&parsed, raw_date.is_empty()) {
                (Some(dt), true) => dt.to_rfc3339(),
                _ => raw_date,
            };
            let published_at = match parsed {
                Some(dt) => PublishedAt::Parsed(dt),
                None => PublishedAt::Raw(published.clone()),
            };

            let summary = entry
                .summary
                .map(|t| t.content)
                .or_else(|| entry.content.and_then(|c| c.body));

            Entry {
                title: normalize(entry.title.as_ref().map(|t| t.content.as_str())),
                link: entry
                    .links
                    .first()
                    .map(|l| l.href.trim().to_string())
                    .unwrap_or_default(),
                summary: normalize(summary.as_deref()),
                published,
                published_at,
                author: normalize(entry.authors.first().map(|a| a.name.as_str())),
                category: normalize(entry.categories.first().map(|c| c.term.as_str())),
                source_name: source_name.to_string(),
                full_content: None,
                content_chunks: None,
            }
        })
        .collect();

    Ok(entries)
}
