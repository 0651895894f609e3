//! Multi-source aggregation.
//!
//! The aggregator owns the configured source table and answers the four query
//! shapes of the service: one source, all sources, latest across sources, and
//! search. Sources are fetched one after another, as is article enrichment;
//! one source failing never prevents the others from being reported.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

use super::enricher::ArticleEnricher;
use super::fetcher::FeedFetcher;
use super::types::{
    EnrichOptions, Enrichment, Entry, FeedSource, MergedResult, SourceFailure, SourceResult,
};
use crate::config::Config;
use crate::http::HttpClient;
use crate::{NewsdeskError, Result};

/// Result-size bounds applied to every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 50,
        }
    }
}

impl Limits {
    /// Clamp a caller-supplied limit into `[1, max_limit]`.
    pub fn resolve(&self, requested: Option<i64>) -> usize {
        let max = self.max_limit.max(1);
        match requested {
            None => self.default_limit.clamp(1, max),
            Some(n) => n.clamp(1, i64::try_from(max).unwrap_or(i64::MAX)) as usize,
        }
    }
}

/// Fetches, merges and filters entries across the configured sources.
pub struct FeedAggregator {
    sources: Vec<FeedSource>,
    fetcher: FeedFetcher,
    enricher: ArticleEnricher,
    limits: Limits,
}

impl FeedAggregator {
    /// Create an aggregator over an explicit source table.
    pub fn new(
        sources: Vec<FeedSource>,
        fetcher: FeedFetcher,
        enricher: ArticleEnricher,
        limits: Limits,
    ) -> Self {
        Self {
            sources,
            fetcher,
            enricher,
            limits,
        }
    }

    /// Build an aggregator from configuration, sharing `client` between the
    /// feed fetcher and the article enricher.
    pub fn from_config(config: &Config, client: Arc<dyn HttpClient>) -> Result<Self> {
        let feeds = &config.feeds;
        let fetcher = FeedFetcher::new(client.clone(), feeds.max_entries_per_feed);
        let enricher = ArticleEnricher::from_config(client, &config.scrape, feeds.chunk_size)?;
        let limits = Limits {
            default_limit: feeds.default_limit,
            max_limit: feeds.max_limit,
        };

        Ok(Self::new(feeds.sources.clone(), fetcher, enricher, limits))
    }

    /// Configured sources, in configuration order.
    pub fn sources(&self) -> &[FeedSource] {
        &self.sources
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Look up a source by name.
    pub fn find_source(&self, name: &str) -> Option<&FeedSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Fetch a single source.
    ///
    /// An unknown name is `NotFound`; a fetch failure is reported inside the
    /// returned result.
    #[instrument(skip(self))]
    pub async fn get_source(
        &self,
        name: &str,
        limit: Option<i64>,
        options: EnrichOptions,
    ) -> Result<SourceResult> {
        let source = self
            .find_source(name)
            .ok_or_else(|| NewsdeskError::NotFound(format!("source '{}'", name)))?;
        let limit = self.limits.resolve(limit);

        Ok(self.fetch_source(source, limit, options).await)
    }

    /// Fetch every source independently, keyed by source name.
    #[instrument(skip(self))]
    pub async fn get_all(
        &self,
        limit: Option<i64>,
        options: EnrichOptions,
    ) -> BTreeMap<String, SourceResult> {
        let limit = self.limits.resolve(limit);
        let mut results = BTreeMap::new();

        for source in &self.sources {
            let result = self.fetch_source(source, limit, options).await;
            results.insert(source.name.clone(), result);
        }

        let failed = results.values().filter(|r| !r.success).count();
        info!(sources = results.len(), failed, "Fetched all sources");

        results
    }

    /// Newest entries across all sources.
    #[instrument(skip(self))]
    pub async fn get_latest(&self, limit: Option<i64>) -> MergedResult {
        let limit = self.limits.resolve(limit);
        let (mut articles, failures) = self.collect_all().await;

        sort_newest_first(&mut articles);
        articles.truncate(limit);

        info!(count = articles.len(), failed = failures.len(), "Merged latest entries");
        MergedResult { articles, failures }
    }

    /// Entries whose title or summary contains `query`, ignoring case,
    /// newest first.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, limit: Option<i64>) -> Result<MergedResult> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(NewsdeskError::Validation(
                "search query must not be empty".to_string(),
            ));
        }
        let limit = self.limits.resolve(limit);

        let (articles, failures) = self.collect_all().await;
        let mut articles: Vec<Entry> = articles.into_iter().filter(|e| e.matches(&needle)).collect();

        sort_newest_first(&mut articles);
        articles.truncate(limit);

        info!(count = articles.len(), failed = failures.len(), "Search completed");
        Ok(MergedResult { articles, failures })
    }

    async fn fetch_source(
        &self,
        source: &FeedSource,
        limit: usize,
        options: EnrichOptions,
    ) -> SourceResult {
        match self.fetcher.fetch(source).await {
            Ok(mut entries) => {
                entries.truncate(limit);
                let entries = if options.scrape {
                    self.enrich_all(entries, options.chunk).await
                } else {
                    entries
                };
                SourceResult::succeeded(&source.name, entries)
            }
            Err(e) => {
                warn!(source = %source.name, error = %e, "Failed to fetch feed");
                SourceResult::failed(&source.name, &e)
            }
        }
    }

    async fn enrich_all(&self, entries: Vec<Entry>, chunk: bool) -> Vec<Entry> {
        stream::iter(entries)
            .then(|entry| async move {
                if entry.link.is_empty() {
                    return entry.enriched(Enrichment {
                        full_content: String::new(),
                        content_chunks: chunk.then(Vec::new),
                    });
                }
                let enrichment = self.enricher.enrich(&entry.link, chunk).await;
                entry.enriched(enrichment)
            })
            .collect()
            .await
    }

    /// Every entry from every source in source-then-document order, plus the
    /// sources that failed.
    async fn collect_all(&self) -> (Vec<Entry>, Vec<SourceFailure>) {
        let mut articles = Vec::new();
        let mut failures = Vec::new();

        for source in &self.sources {
            match self.fetcher.fetch(source).await {
                Ok(entries) => articles.extend(entries),
                Err(e) => {
                    warn!(source = %source.name, error = %e, "Failed to fetch feed");
                    failures.push(SourceFailure::new(&source.name, &e));
                }
            }
        }

        (articles, failures)
    }
}

/// Stable descending sort by publication date.
fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
