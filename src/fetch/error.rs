//! Transport-level errors for prediction requests.

use std::fmt;

/// Errors raised before a response body could be read.
#[derive(Debug)]
pub enum FetchError {
    /// The endpoint could not be parsed as a URL
    InvalidUrl { url: String, message: String },

    /// Network failure, timeout, or body read error
    Http(reqwest::Error),

    /// The API answered with a non-success status
    Status(u16),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::InvalidUrl { url, message } => write!(f, "invalid URL '{url}': {message}"),
            FetchError::Http(e) => write!(f, "HTTP error: {e}"),
            FetchError::Status(429) => write!(f, "API returned status 429 (rate limited)"),
            FetchError::Status(status) => write!(f, "API returned status {status}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err)
    }
}
