//! Error types for the pricing service.

/// Failures of the external feeds.
///
/// Neither is fatal: callers log them and keep their last known-good value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("Location lookup failed: {0}")]
    LocationLookup(String),

    #[error("Rate fetch failed: {0}")]
    RateFetch(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
