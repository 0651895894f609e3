//! Error types for newsdesk.

use serde::Serialize;
use thiserror::Error;

/// Failure while retrieving or parsing a remote document (feed or article page).
///
/// These are always recovered at the narrowest scope (one source, one article)
/// and reported inline instead of failing the whole request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Timeout, DNS failure, refused connection, non-2xx status, oversize body
    /// or a URL the transport refuses to contact.
    #[error("network error: {0}")]
    Network(String),

    /// The document was retrieved but is not a well-formed feed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Category of a [`FetchError`], as reported in JSON results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorKind {
    Network,
    Parse,
}

impl FetchError {
    /// The category of this error.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::Parse(_) => FetchErrorKind::Parse,
        }
    }
}

/// Common error type for newsdesk.
#[derive(Error, Debug)]
pub enum NewsdeskError {
    /// Invalid or missing caller input (e.g. an empty search query).
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Upstream fetch failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for newsdesk operations.
pub type Result<T> = std::result::Result<T, NewsdeskError>;
