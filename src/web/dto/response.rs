//! Response DTOs for Web API.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::feed::{Entry, MergedResult, SourceFailure, SourceResult};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
///
/// The payload's fields are flattened next to `success`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true`; errors use [`crate::web::error::ErrorBody`].
    pub success: bool,
    /// Response data.
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// ============================================================================
// Feed Responses
// ============================================================================

/// Every source keyed by name.
#[derive(Debug, Serialize)]
pub struct AllFeedsResponse {
    pub feeds: BTreeMap<String, SourceResult>,
}

/// Merged entries across sources.
#[derive(Debug, Serialize)]
pub struct MergedResponse {
    pub count: usize,
    pub articles: Vec<Entry>,
    pub failures: Vec<SourceFailure>,
}

impl From<MergedResult> for MergedResponse {
    fn from(merged: MergedResult) -> Self {
        Self {
            count: merged.articles.len(),
            articles: merged.articles,
            failures: merged.failures,
        }
    }
}

/// Search results, echoing the query.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(flatten)]
    pub results: MergedResponse,
}

// ============================================================================
// Service Responses
// ============================================================================

/// Service metadata returned by `/`.
#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub sources: Vec<String>,
    pub endpoints: Vec<EndpointInfo>,
}

/// One route in the service metadata.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointInfo {
    pub path: &'static str,
    pub description: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// RFC 3339 time of the check.
    pub timestamp: String,
}
