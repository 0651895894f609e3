//! Article scraping and sentence chunking.

use std::sync::Arc;

use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};
use unicode_segmentation::UnicodeSegmentation;

use super::normalize::normalize;
use super::types::Enrichment;
use crate::config::{ScrapeConfig, StrategyConfig};
use crate::http::HttpClient;
use crate::{NewsdeskError, Result};

/// Locates the article body in a parsed page.
pub trait ExtractionStrategy: Send + Sync {
    /// Whether this strategy applies to pages served from `host`.
    fn matches(&self, host: &str) -> bool;

    /// Paragraph texts of the primary content block, or `None` if the page
    /// has no such block.
    fn extract(&self, document: &Html) -> Option<Vec<String>>;
}

/// Strategy for one domain, driven by a container and a paragraph selector.
pub struct SelectorStrategy {
    domain: String,
    container: Selector,
    paragraph: Selector,
}

impl SelectorStrategy {
    /// Build a strategy from its configuration.
    pub fn from_config(config: &StrategyConfig) -> Result<Self> {
        let parse = |selector: &str| {
            Selector::parse(selector).map_err(|e| {
                NewsdeskError::Config(format!(
                    "invalid CSS selector for {}: {} ({})",
                    config.domain, selector, e
                ))
            })
        };

        Ok(Self {
            domain: config.domain.trim().to_lowercase(),
            container: parse(&config.container)?,
            paragraph: parse(&config.paragraph)?,
        })
    }
}

impl ExtractionStrategy for SelectorStrategy {
    fn matches(&self, host: &str) -> bool {
        host == self.domain
            || host
                .strip_suffix(self.domain.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    fn extract(&self, document: &Html) -> Option<Vec<String>> {
        let block = document.select(&self.container).next()?;
        Some(paragraphs(block, &self.paragraph))
    }
}

/// Generic extraction: first `article`, then `main`, then `body`.
pub struct FallbackStrategy {
    containers: Vec<Selector>,
    paragraph: Option<Selector>,
}

impl FallbackStrategy {
    pub fn new() -> Self {
        Self {
            containers: ["article", "main", "body"]
                .iter()
                .filter_map(|s| Selector::parse(s).ok())
                .collect(),
            paragraph: Selector::parse("p").ok(),
        }
    }
}

impl Default for FallbackStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for FallbackStrategy {
    fn matches(&self, _host: &str) -> bool {
        true
    }

    fn extract(&self, document: &Html) -> Option<Vec<String>> {
        let paragraph = self.paragraph.as_ref()?;
        let block = self
            .containers
            .iter()
            .find_map(|container| document.select(container).next())?;
        Some(paragraphs(block, paragraph))
    }
}

fn paragraphs(block: scraper::ElementRef<'_>, selector: &Selector) -> Vec<String> {
    block
        .select(selector)
        .map(|p| normalize(Some(&p.text().collect::<String>())))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Fetches article pages and extracts their text.
pub struct ArticleEnricher {
    client: Arc<dyn HttpClient>,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    fallback: FallbackStrategy,
    chunk_size: usize,
}

impl ArticleEnricher {
    /// Create an enricher with the given per-domain strategies.
    pub fn new(
        client: Arc<dyn HttpClient>,
        strategies: Vec<Box<dyn ExtractionStrategy>>,
        chunk_size: usize,
    ) -> Self {
        Self {
            client,
            strategies,
            fallback: FallbackStrategy::new(),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Create an enricher from the scraping configuration.
    pub fn from_config(
        client: Arc<dyn HttpClient>,
        config: &ScrapeConfig,
        chunk_size: usize,
    ) -> Result<Self> {
        let strategies = config
            .strategies
            .iter()
            .map(|s| SelectorStrategy::from_config(s).map(|s| Box::new(s) as Box<dyn ExtractionStrategy>))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(client, strategies, chunk_size))
    }

    /// Fetch `url` and extract its article text.
    ///
    /// Failures are logged and produce empty content.
    #[instrument(skip(self))]
    pub async fn enrich(&self, url: &str, chunk: bool) -> Enrichment {
        let full_content = match self.client.get(url).await {
            Ok(body) => self.extract_text(url, &body),
            Err(e) => {
                warn!(error = %e, "Failed to fetch article");
                String::new()
            }
        };

        let content_chunks = chunk.then(|| chunk_sentences(&full_content, self.chunk_size));

        Enrichment {
            full_content,
            content_chunks,
        }
    }

    /// Extract the article text of an HTML page served from `url`.
    pub fn extract_text(&self, url: &str, body: &[u8]) -> String {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
            .unwrap_or_default();

        let document = Html::parse_document(&String::from_utf8_lossy(body));

        let site = self
            .strategies
            .iter()
            .find(|s| s.matches(&host))
            .and_then(|s| s.extract(&document));

        let paragraphs = match site {
            Some(paragraphs) => paragraphs,
            None => self.fallback.extract(&document).unwrap_or_default(),
        };

        if paragraphs.is_empty() {
            debug!(host = %host, "No article text found");
        }

        paragraphs.join("\n")
    }
}

/// Split text into sentences and group them `size` at a time.
///
/// Sentences are trimmed and empty ones dropped; each group is joined with a
/// single space.
pub fn chunk_sentences(text: &str, size: usize) -> Vec<String> {
    let sentences: Vec<&str> = text
        .split_sentence_bounds()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    sentences
        .chunks(size.max(1))
        .map(|group| group.join(" "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::http::mock::MockHttpClient;

    const PAGE: &str = r#"<html><body>
<div class="menu"><p>Trang chủ</p></div>
<article><p>Fallback paragraph.</p></article>
<div class="detail-content">
  <p>Câu thứ nhất. Câu thứ hai!</p>
  <p>   </p>
  <p>Đoạn <b>hai</b>.</p>
</div>
</body></html>"#;

    fn strategy(domain: &str, container: &str) -> Box<dyn ExtractionStrategy> {
        Box::new(
            SelectorStrategy::from_config(&StrategyConfig {
                domain: domain.to_string(),
                container: container.to_string(),
                paragraph: "p".to_string(),
            })
            .unwrap(),
        )
    }

    fn enricher(client: MockHttpClient) -> ArticleEnricher {
        ArticleEnricher::new(
            Arc::new(client),
            vec![strategy("cafef.vn", ".detail-content")],
            2,
        )
    }

    #[test]
    fn test_selector_strategy_matches_subdomains() {
        let s = strategy("cafef.vn", ".detail-content");

        assert!(s.matches("cafef.vn"));
        assert!(s.matches("m.cafef.vn"));
        assert!(!s.matches("notcafef.vn"));
        assert!(!s.matches("vneconomy.vn"));
    }

    #[test]
    fn test_selector_strategy_invalid_selector() {
        let result = SelectorStrategy::from_config(&StrategyConfig {
            domain: "x.vn".to_string(),
            container: "div[[".to_string(),
            paragraph: "p".to_string(),
        });

        assert!(matches!(result, Err(NewsdeskError::Config(_))));
    }

    #[test]
    fn test_extract_text_site_strategy() {
        let enricher = enricher(MockHttpClient::new());

        let text = enricher.extract_text("https://cafef.vn/bai-viet.chn", PAGE.as_bytes());
        assert_eq!(text, "Câu thứ nhất. Câu thứ hai!\nĐoạn hai.");
    }

    #[test]
    fn test_extract_text_fallback_order() {
        let enricher = enricher(MockHttpClient::new());

        // Unknown host uses the generic strategy, which prefers <article>
        let text = enricher.extract_text("https://other.vn/a", PAGE.as_bytes());
        assert_eq!(text, "Fallback paragraph.");

        let text = enricher.extract_text(
            "https://other.vn/b",
            b"<html><body><main><p>In main.</p></main><p>Outside.</p></body></html>",
        );
        assert_eq!(text, "In main.");

        let text = enricher.extract_text(
            "https://other.vn/c",
            b"<html><body><p>One.</p><div><p>Two.</p></div></body></html>",
        );
        assert_eq!(text, "One.\nTwo.");
    }

    #[test]
    fn test_extract_text_site_container_missing_falls_back() {
        let enricher = enricher(MockHttpClient::new());

        let text = enricher.extract_text(
            "https://cafef.vn/x",
            b"<html><body><article><p>Generic.</p></article></body></html>",
        );
        assert_eq!(text, "Generic.");
    }

    #[test]
    fn test_extract_text_no_paragraphs() {
        let enricher = enricher(MockHttpClient::new());

        let text = enricher.extract_text("https://other.vn/a", b"<html><body>plain</body></html>");
        assert_eq!(text, "");
    }

    #[test]
    fn test_chunk_sentences() {
        let text = "One. Two! Three? Four.\nFive.";

        assert_eq!(
            chunk_sentences(text, 2),
            vec!["One. Two!", "Three? Four.", "Five."]
        );
        assert_eq!(chunk_sentences(text, 5), vec!["One. Two! Three? Four. Five."]);
        assert!(chunk_sentences("", 5).is_empty());
        assert!(chunk_sentences("   \n ", 5).is_empty());
    }

    #[tokio::test]
    async fn test_enrich_with_chunks() {
        let enricher =
            enricher(MockHttpClient::new().with_body("https://cafef.vn/bai-viet.chn", PAGE));

        let enrichment = enricher.enrich("https://cafef.vn/bai-viet.chn", true).await;

        assert_eq!(enrichment.full_content, "Câu thứ nhất. Câu thứ hai!\nĐoạn hai.");
        assert_eq!(
            enrichment.content_chunks,
            Some(vec![
                "Câu thứ nhất. Câu thứ hai!".to_string(),
                "Đoạn hai.".to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn test_enrich_without_chunks() {
        let enricher =
            enricher(MockHttpClient::new().with_body("https://cafef.vn/bai-viet.chn", PAGE));

        let enrichment = enricher.enrich("https://cafef.vn/bai-viet.chn", false).await;

        assert!(!enrichment.full_content.is_empty());
        assert!(enrichment.content_chunks.is_none());
    }

    #[tokio::test]
    async fn test_enrich_failure_is_empty() {
        let enricher = enricher(
            MockHttpClient::new()
                .with_error("https://cafef.vn/down", FetchError::Network("timed out".to_string())),
        );

        let enrichment = enricher.enrich("https://cafef.vn/down", true).await;

        assert_eq!(enrichment.full_content, "");
        assert_eq!(enrichment.content_chunks, Some(vec![]));
    }

    #[test]
    fn test_from_config_defaults() {
        let enricher = ArticleEnricher::from_config(
            Arc::new(MockHttpClient::new()),
            &ScrapeConfig::default(),
            5,
        )
        .unwrap();

        assert_eq!(enricher.strategies.len(), 3);
    }
}
