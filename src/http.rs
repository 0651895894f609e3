//! Outbound HTTP transport with security measures.
//!
//! Every feed and article request goes through the [`HttpClient`] trait so
//! that the fetch pipeline can be exercised without a network. The production
//! implementation enforces timeouts, a redirect limit, a body size cap and
//! SSRF protection.

use async_trait::async_trait;
use reqwest::Client;
use std::net::IpAddr;
use std::time::Duration;

use crate::config::FeedsConfig;
use crate::error::FetchError;
use crate::{NewsdeskError, Result};

/// Transport used to retrieve remote documents.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch `url` and return the response body.
    ///
    /// Non-2xx responses, timeouts and refused hosts are all
    /// [`FetchError::Network`].
    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// [`HttpClient`] backed by reqwest.
pub struct ReqwestClient {
    client: Client,
    max_body_bytes: u64,
    block_private_hosts: bool,
}

impl ReqwestClient {
    /// Create a client from the feed configuration.
    pub fn new(config: &FeedsConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| NewsdeskError::Internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_body_bytes: config.max_document_size_bytes,
            block_private_hosts: config.block_private_hosts,
        })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        if self.block_private_hosts {
            validate_url(url)?;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FetchError::Network(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_body_bytes {
                return Err(FetchError::Network(format!(
                    "document too large: {} bytes (max {} bytes)",
                    content_length, self.max_body_bytes
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("failed to read response: {}", e)))?;

        // Content-Length may be absent or wrong for compressed bodies
        if bytes.len() as u64 > self.max_body_bytes {
            return Err(FetchError::Network(format!(
                "document too large: {} bytes (max {} bytes)",
                bytes.len(),
                self.max_body_bytes
            )));
        }

        Ok(bytes.to_vec())
    }
}

/// Validate a URL for SSRF protection.
///
/// This function checks that:
/// - The URL uses http or https scheme
/// - The host is not a private/loopback address
/// - The host is not a reserved hostname
pub fn validate_url(url: &str) -> std::result::Result<(), FetchError> {
    let parsed =
        url::Url::parse(url).map_err(|e| FetchError::Network(format!("invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(FetchError::Network(format!(
                "unsupported URL scheme: {}",
                scheme
            )));
        }
    }

    let host = parsed
        .host()
        .ok_or_else(|| FetchError::Network("URL has no host".to_string()))?;

    let ip = match host {
        url::Host::Domain(domain) => {
            if is_forbidden_hostname(domain) {
                return Err(FetchError::Network(format!("forbidden host: {}", domain)));
            }
            return Ok(());
        }
        url::Host::Ipv4(ipv4) => IpAddr::V4(ipv4),
        url::Host::Ipv6(ipv6) => IpAddr::V6(ipv6),
    };

    if is_private_ip(&ip) {
        return Err(FetchError::Network(format!(
            "private IP address not allowed: {}",
            ip
        )));
    }

    Ok(())
}

/// Check if a hostname is forbidden.
fn is_forbidden_hostname(host: &str) -> bool {
    const FORBIDDEN_SUFFIXES: [&str; 7] = [
        ".local",
        ".localhost",
        ".internal",
        ".intranet",
        ".corp",
        ".home",
        ".lan",
    ];

    let host = host.to_lowercase();
    host == "localhost" || FORBIDDEN_SUFFIXES.iter().any(|s| host.ends_with(s))
}

/// Check if an IP address is loopback, private, link-local or otherwise reserved.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            let octets = ipv4.octets();
            ipv4.is_loopback()
                || ipv4.is_private()
                || ipv4.is_link_local()
                || ipv4.is_broadcast()
                || ipv4.is_unspecified()
                // Documentation: 192.0.2.0/24, 198.51.100.0/24, 203.0.113.0/24
                || matches!(octets, [192, 0, 2, _] | [198, 51, 100, _] | [203, 0, 113, _])
        }
        IpAddr::V6(ipv6) => {
            let first = ipv6.segments()[0];
            ipv6.is_loopback()
                || ipv6.is_unspecified()
                // Unique local: fc00::/7
                || (first & 0xfe00) == 0xfc00
                // Link-local: fe80::/10
                || (first & 0xffc0) == 0xfe80
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted in-memory transport for unit tests.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockHttpClient {
        responses: HashMap<String, std::result::Result<Vec<u8>, FetchError>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_body(mut self, url: &str, body: &str) -> Self {
            self.responses
                .insert(url.to_string(), Ok(body.as_bytes().to_vec()));
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
        async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::Network(format!("HTTP error: 404 ({})", url))))
        }
    }
}
