//! Error types for talking to the dashboard backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Could not reach the backend at all.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Backend answered with a non-success status.
    #[error("backend returned status {0}")]
    Http(reqwest::StatusCode),

    /// Body was not the JSON we expected.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Any other transport failure.
    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("TLS setup failed: {0}")]
    Tls(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Http(status)
        } else {
            FetchError::Request(err.to_string())
        }
    }
}
