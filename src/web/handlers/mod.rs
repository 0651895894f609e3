//! API handlers.

pub mod feeds;
pub mod meta;

pub use feeds::*;
pub use meta::*;

use std::sync::Arc;

use crate::feed::FeedAggregator;

/// Shared application state.
pub struct AppState {
    /// Read-only aggregator shared by all requests.
    pub aggregator: Arc<FeedAggregator>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(aggregator: Arc<FeedAggregator>) -> Self {
        Self { aggregator }
    }
}
