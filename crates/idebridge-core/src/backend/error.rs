//! Backend transport errors

use thiserror::Error;

/// Errors raised before an HTTP status is available
///
/// Non-success statuses are not errors at this layer; they come back as
/// a [`BackendResponse`](super::BackendResponse) and each caller decides.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type BackendResult<T> = Result<T, BackendError>;
