//! Upstream feed error types.

use super::convert::MalformedEnvelope;

/// Errors from fetching or decoding the vehicle location feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON for the envelope
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Response body was not a readable SIRI-VM XML document
    #[error("XML parse error: {message}")]
    Xml {
        message: String,
        body: Option<String>,
    },

    /// Feed returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the upstream provider
    #[error("rate limited by the vehicle location feed")]
    RateLimited,

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Envelope decoded but lacks the vehicle activity list
    #[error(transparent)]
    Malformed(#[from] MalformedEnvelope),

    /// Mock feed data could not be loaded
    #[error("mock feed error: {0}")]
    Mock(String),
}

impl FeedError {
    /// Whether the upstream rejected our credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, FeedError::Unauthorized)
    }
}
