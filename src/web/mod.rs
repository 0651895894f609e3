//! Web API module for newsdesk.
//!
//! A read-only JSON API over the feed aggregator.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
