//! Feed aggregation pipeline.
//!
//! Data flows strictly downward: [`FeedAggregator`] → [`FeedFetcher`] →
//! (optionally) [`ArticleEnricher`] → [`normalize`].

pub mod aggregator;
pub mod dates;
pub mod enricher;
pub mod fetcher;
pub mod normalize;
pub mod types;

pub use aggregator::{FeedAggregator, Limits};
pub use enricher::{chunk_sentences, ArticleEnricher, ExtractionStrategy, SelectorStrategy};
pub use fetcher::{parse_entries, FeedFetcher};
pub use normalize::normalize;
pub use types::{
    EnrichOptions, Enrichment, Entry, FeedSource, MergedResult, PublishedAt, SourceFailure,
    SourceResult,
};
