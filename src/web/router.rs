//! Router configuration for Web API.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    get_all_feeds, get_feed, get_latest, health_check, index, not_found, search, AppState,
};
use super::middleware::create_cors_layer;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let feed_routes = Router::new()
        .route("/", get(index))
        .route("/feeds", get(get_all_feeds))
        .route("/feeds/:source", get(get_feed))
        .route("/latest", get(get_latest))
        .route("/search", get(search));

    // Legacy /api paths
    let api_routes = Router::new()
        .route("/news", get(get_all_feeds))
        .route("/:source", get(get_feed));

    Router::new()
        .merge(feed_routes)
        .nest("/api", api_routes)
        .merge(create_health_router())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::feed::FeedAggregator;
    use crate::http::mock::MockHttpClient;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let aggregator =
            FeedAggregator::from_config(&Config::default(), Arc::new(MockHttpClient::new()))
                .unwrap();
        create_router(Arc::new(AppState::new(Arc::new(aggregator))), &[])
    }

    async fn status(uri: &str) -> StatusCode {
        router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_route() {
        assert_eq!(status("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        assert_eq!(status("/nope/at/all").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_source_is_404() {
        assert_eq!(status("/feeds/nope").await, StatusCode::NOT_FOUND);
        assert_eq!(status("/api/nope").await, StatusCode::NOT_FOUND);
    }
}
