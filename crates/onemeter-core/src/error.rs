//! API error taxonomy

use thiserror::Error;

/// Errors raised by a cloud API call.
///
/// The flow layer collapses all of these to a single user-facing `auth`
/// error code; the detailed variant only ever reaches the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication rejected by the cloud API")]
    Auth,

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("worker task failed: {0}")]
    Internal(String),
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
