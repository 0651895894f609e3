//! newsdesk - News feed aggregator
//!
//! Fetches a configured set of RSS/Atom feeds, normalizes their entries,
//! optionally scrapes the linked articles, and serves the result as JSON.

pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{FetchError, FetchErrorKind, NewsdeskError, Result};
pub use feed::{
    EnrichOptions, Entry, FeedAggregator, FeedSource, MergedResult, PublishedAt, SourceResult,
};
pub use http::{HttpClient, ReqwestClient};
pub use web::WebServer;
