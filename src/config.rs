//! Configuration module for newsdesk.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::feed::FeedSource;
use crate::{NewsdeskError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins (empty = any origin).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file. Console only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Feed fetching configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedsConfig {
    /// Maximum entries kept from a single feed document.
    #[serde(default = "default_max_entries_per_feed")]
    pub max_entries_per_feed: usize,
    /// Limit used when the caller does not pass one.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Upper bound for any caller-supplied limit.
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// Sentences per content chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Maximum size of a feed or article document in bytes.
    #[serde(default = "default_max_document_size")]
    pub max_document_size_bytes: u64,
    /// User agent sent with every outbound request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Refuse to contact loopback, private and link-local hosts.
    #[serde(default = "default_block_private_hosts")]
    pub block_private_hosts: bool,
    /// Configured feed sources.
    #[serde(default = "default_sources")]
    pub sources: Vec<FeedSource>,
}

fn default_max_entries_per_feed() -> usize {
    20
}

fn default_limit() -> usize {
    20
}

fn default_max_limit() -> usize {
    50
}

fn default_chunk_size() -> usize {
    5
}

fn default_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_document_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (compatible; newsdesk/{}; +https://github.com/newsdesk)",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_block_private_hosts() -> bool {
    true
}

fn default_sources() -> Vec<FeedSource> {
    vec![
        FeedSource::new(
            "cafef-chung-khoan",
            "https://cafef.vn/thi-truong-chung-khoan.rss",
        ),
        FeedSource::new(
            "vneconomy-chung-khoan",
            "https://vneconomy.vn/chung-khoan.rss",
        ),
        FeedSource::new("vneconomy-tai-chinh", "https://vneconomy.vn/tai-chinh.rss"),
        FeedSource::new("vneconomy-thi-truong", "https://vneconomy.vn/thi-truong.rss"),
        FeedSource::new(
            "vneconomy-doanh-nghiep",
            "https://vneconomy.vn/nhip-cau-doanh-nghiep.rss",
        ),
        FeedSource::new("vneconomy-tin-moi", "https://vneconomy.vn/tin-moi.rss"),
        FeedSource::new(
            "cafebiz-kinh-doanh",
            "https://cafebiz.vn/rss/cau-chuyen-kinh-doanh.rss",
        ),
    ]
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            max_entries_per_feed: default_max_entries_per_feed(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            chunk_size: default_chunk_size(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_redirects: default_max_redirects(),
            max_document_size_bytes: default_max_document_size(),
            user_agent: default_user_agent(),
            block_private_hosts: default_block_private_hosts(),
            sources: default_sources(),
        }
    }
}

/// Content extraction rule for one site.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StrategyConfig {
    /// Domain the rule applies to (subdomains included).
    pub domain: String,
    /// CSS selector of the element holding the article body.
    pub container: String,
    /// CSS selector of paragraphs inside the container.
    #[serde(default = "default_paragraph_selector")]
    pub paragraph: String,
}

fn default_paragraph_selector() -> String {
    "p".to_string()
}

impl StrategyConfig {
    fn new(domain: &str, container: &str) -> Self {
        Self {
            domain: domain.to_string(),
            container: container.to_string(),
            paragraph: default_paragraph_selector(),
        }
    }
}

/// Article scraping configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Per-domain extraction rules, tried before the generic fallback.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<StrategyConfig>,
}

fn default_strategies() -> Vec<StrategyConfig> {
    vec![
        StrategyConfig::new("cafef.vn", ".detail-content"),
        StrategyConfig::new("vneconomy.vn", ".detail__content"),
        StrategyConfig::new("cafebiz.vn", ".detail-content"),
    ]
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Feed configuration.
    #[serde(default)]
    pub feeds: FeedsConfig,
    /// Scraping configuration.
    #[serde(default)]
    pub scrape: ScrapeConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(NewsdeskError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| NewsdeskError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `NEWSDESK_HOST`: bind address
    /// - `NEWSDESK_PORT`: listen port (ignored if not a valid port)
    /// - `NEWSDESK_LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("NEWSDESK_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }

        if let Ok(port) = std::env::var("NEWSDESK_PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid NEWSDESK_PORT value: {}", port),
            }
        }

        if let Ok(level) = std::env::var("NEWSDESK_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let feeds = &self.feeds;

        if feeds.sources.is_empty() {
            return Err(NewsdeskError::Config(
                "at least one feed source must be configured".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for source in &feeds.sources {
            if source.name.trim().is_empty() {
                return Err(NewsdeskError::Config(format!(
                    "feed source with URL {} has an empty name",
                    source.url
                )));
            }
            if !names.insert(source.name.as_str()) {
                return Err(NewsdeskError::Config(format!(
                    "duplicate feed source name: {}",
                    source.name
                )));
            }
            match url::Url::parse(&source.url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                _ => {
                    return Err(NewsdeskError::Config(format!(
                        "feed source {} has an invalid URL: {}",
                        source.name, source.url
                    )));
                }
            }
        }

        if feeds.max_limit == 0 {
            return Err(NewsdeskError::Config(
                "max_limit must be at least 1".to_string(),
            ));
        }
        if feeds.default_limit == 0 || feeds.default_limit > feeds.max_limit {
            return Err(NewsdeskError::Config(format!(
                "default_limit must be between 1 and max_limit ({})",
                feeds.max_limit
            )));
        }
        if feeds.chunk_size == 0 {
            return Err(NewsdeskError::Config(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        if feeds.max_entries_per_feed == 0 {
            return Err(NewsdeskError::Config(
                "max_entries_per_feed must be at least 1".to_string(),
            ));
        }

        for strategy in &self.scrape.strategies {
            if strategy.domain.trim().is_empty() {
                return Err(NewsdeskError::Config(
                    "scrape strategy with an empty domain".to_string(),
                ));
            }
            for selector in [&strategy.container, &strategy.paragraph] {
                if scraper::Selector::parse(selector).is_err() {
                    return Err(NewsdeskError::Config(format!(
                        "invalid CSS selector for {}: {}",
                        strategy.domain, selector
                    )));
                }
            }
        }

        Ok(())
    }
}
