//! Upstream source error types.

use super::convert::ConversionError;

/// Errors from an upstream data source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (network error, client-side timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by upstream API")]
    RateLimited,

    /// Invalid API key or unauthorized
    #[error("unauthorized: check MAV_API_KEY")]
    Unauthorized,

    /// Response parsed but did not describe valid rail data
    #[error("invalid upstream data: {0}")]
    Invalid(#[from] ConversionError),

    /// Snapshot file could not be read
    #[error("snapshot error: {message}")]
    Snapshot { message: String },
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(" (body: {body})"),
        None => String::new(),
    }
}
