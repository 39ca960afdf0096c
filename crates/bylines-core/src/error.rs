use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during Bylines core operations.
///
/// None of these ever escape [`BookExtractor::extract`](crate::BookExtractor::extract);
/// fallback failures are logged and degraded to an empty fallback result.
#[derive(Debug, Error)]
pub enum BylinesError {
    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// The probabilistic backend is not configured (e.g. no API key).
    #[error("fallback backend unavailable: {0}")]
    FallbackUnavailable(String),

    /// The probabilistic backend could not be reached or returned an error status.
    #[error("fallback transport error: {0}")]
    FallbackTransport(String),

    /// The fallback call did not finish within the configured bound.
    #[error("fallback timed out after {0:?}")]
    FallbackTimeout(Duration),

    /// The backend answered, but not in a shape we understand.
    #[error("malformed fallback response: {0}")]
    MalformedResponse(String),
}

/// Result type alias for Bylines operations.
pub type Result<T> = std::result::Result<T, BylinesError>;
