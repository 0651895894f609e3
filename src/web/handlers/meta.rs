//! Service metadata and health handlers.

use axum::{extract::State, http::Uri, Json};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::{EndpointInfo, HealthResponse, ServiceInfoResponse};
use crate::web::error::ApiError;

const ENDPOINTS: &[EndpointInfo] = &[
    EndpointInfo {
        path: "/feeds",
        description: "All sources (alias: /api/news)",
    },
    EndpointInfo {
        path: "/feeds/{source}",
        description: "One source (alias: /api/{source})",
    },
    EndpointInfo {
        path: "/latest",
        description: "Newest entries across all sources",
    },
    EndpointInfo {
        path: "/search?q=",
        description: "Entries whose title or summary contain q",
    },
    EndpointInfo {
        path: "/health",
        description: "Health check",
    },
];

/// GET / - Service metadata.
pub async fn index(State(state): State<Arc<AppState>>) -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        name: "News Aggregator API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: env!("CARGO_PKG_DESCRIPTION").to_string(),
        sources: state
            .aggregator
            .sources()
            .iter()
            .map(|s| s.name.clone())
            .collect(),
        endpoints: ENDPOINTS.to_vec(),
    })
}

/// GET /health - Liveness check.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("route {} not found", uri.path()))
}
