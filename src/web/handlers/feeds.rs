//! Feed handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::feed::SourceResult;
use crate::web::dto::{
    AllFeedsResponse, ApiResponse, FeedQuery, LatestQuery, MergedResponse, SearchQuery,
    SearchResponse,
};
use crate::web::error::ApiError;

/// GET /feeds, /api/news - Every source, fetched independently.
pub async fn get_all_feeds(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> Json<ApiResponse<AllFeedsResponse>> {
    let feeds = state
        .aggregator
        .get_all(query.limit, query.enrich_options())
        .await;

    Json(ApiResponse::new(AllFeedsResponse { feeds }))
}

/// GET /feeds/:source, /api/:source - One source.
///
/// Responds 404 for an unknown source and 500 when the fetch failed.
pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    Path(source): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<SourceResult>, ApiError> {
    let result = state
        .aggregator
        .get_source(&source, query.limit, query.enrich_options())
        .await?;

    if !result.success {
        let message = result
            .error
            .unwrap_or_else(|| format!("failed to fetch source '{}'", source));
        return Err(ApiError::upstream(message));
    }

    Ok(Json(result))
}

/// GET /latest - Newest entries across all sources.
pub async fn get_latest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LatestQuery>,
) -> Json<ApiResponse<MergedResponse>> {
    let merged = state.aggregator.get_latest(query.limit).await;

    Json(ApiResponse::new(merged.into()))
}

/// GET /search - Entries whose title or summary contain `q`.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResponse>>, ApiError> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("query parameter 'q' is required"))?;

    let merged = state.aggregator.search(q, query.limit).await?;

    Ok(Json(ApiResponse::new(SearchResponse {
        query: q.to_string(),
        results: merged.into(),
    })))
}
