//! Test helpers for integration tests.
//!
//! Provides a scripted in-memory HTTP transport and feed fixtures, so the
//! whole pipeline runs without a network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;

use newsdesk::config::Config;
use newsdesk::feed::{ArticleEnricher, FeedAggregator, FeedFetcher, FeedSource, Limits};
use newsdesk::web::create_router;
use newsdesk::web::handlers::AppState;
use newsdesk::{FetchError, HttpClient};

/// In-memory transport answering from a fixed URL table.
///
/// Unknown URLs fail with a network error. Every request is recorded.
#[derive(Default)]
pub struct MockHttpClient {
    responses: HashMap<String, Result<Vec<u8>, FetchError>>,
    calls: Mutex<Vec<String>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: impl Into<String>) -> Self {
        self.responses
            .insert(url.to_string(), Ok(body.into().into_bytes()));
        self
    }

    pub fn with_error(mut self, url: &str, error: FetchError) -> Self {
        self.responses.insert(url.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses.get(url).cloned().unwrap_or_else(|| {
            Err(FetchError::Network(format!(
                "HTTP error: 404 Not Found ({})",
                url
            )))
        })
    }
}

/// One `<item>` of an RSS fixture.
pub struct Item {
    pub title: &'static str,
    pub link: &'static str,
    pub description: &'static str,
    pub pub_date: Option<&'static str>,
}

impl Item {
    pub fn new(title: &'static str, link: &'static str) -> Self {
        Self {
            title,
            link,
            description: "",
            pub_date: None,
        }
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn dated(mut self, pub_date: &'static str) -> Self {
        self.pub_date = Some(pub_date);
        self
    }
}

/// Build an RSS 2.0 document.
pub fn rss(title: &str, items: &[Item]) -> String {
    let items: String = items
        .iter()
        .map(|item| {
            let date = item
                .pub_date
                .map(|d| format!("<pubDate>{d}</pubDate>"))
                .unwrap_or_default();
            format!(
                "<item><title><![CDATA[{}]]></title><link>{}</link><description><![CDATA[{}]]></description>{}</item>",
                item.title, item.link, item.description, date
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>{title}</title><link>https://example.test</link>{items}</channel></rss>"#
    )
}

/// Build an article page with the body inside `<article>`.
pub fn article_page(paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
    format!(
        "<html><head><title>x</title></head><body><nav><p>Menu</p></nav><article>{body}</article></body></html>"
    )
}

/// Build an aggregator over `sources` backed by `client`.
pub fn aggregator(sources: Vec<FeedSource>, client: Arc<MockHttpClient>) -> FeedAggregator {
    let config = Config::default();
    FeedAggregator::new(
        sources,
        FeedFetcher::new(client.clone(), config.feeds.max_entries_per_feed),
        ArticleEnricher::from_config(client, &config.scrape, config.feeds.chunk_size)
            .expect("default scrape config"),
        Limits {
            default_limit: config.feeds.default_limit,
            max_limit: config.feeds.max_limit,
        },
    )
}

/// Create a test server over `sources` backed by `client`.
pub fn create_test_server(sources: Vec<FeedSource>, client: Arc<MockHttpClient>) -> TestServer {
    let aggregator = Arc::new(aggregator(sources, client));
    let router = create_router(Arc::new(AppState::new(aggregator)), &[]);

    TestServer::new(router).expect("Failed to create test server")
}
