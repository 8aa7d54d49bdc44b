//! Bus Open Data Service HTTP client.
//!
//! Fetches the SIRI-VM vehicle location datafeed for a bounding box. The
//! provider enforces its own request quota; callers are expected to sit
//! behind [`crate::live::FeedGate`] rather than call this directly per
//! client request.

use std::time::Duration;

use crate::domain::BoundingBox;

use super::error::FeedError;
use super::types::SiriEnvelope;
use super::xml;

/// Default base URL for the BODS API.
const DEFAULT_BASE_URL: &str = "https://data.bus-data.dft.gov.uk/api/v1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How much of an undecodable body to keep for diagnostics.
const BODY_EXCERPT_CHARS: usize = 500;

/// Configuration for the BODS client.
#[derive(Debug, Clone)]
pub struct BodsConfig {
    /// API key, sent as the `api_key` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production BODS)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BodsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// BODS datafeed client.
#[derive(Debug, Clone)]
pub struct BodsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BodsClient {
    /// Create a new BODS client with the given configuration.
    pub fn new(config: BodsConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    /// Fetch current vehicle positions inside `bbox`.
    ///
    /// The datafeed answers in SIRI-VM XML; a body labelled as JSON is
    /// decoded as JSON instead. Returns the raw envelope; use
    /// [`super::project`] to get the activity list out of it.
    pub async fn fetch_vehicle_locations(
        &self,
        bbox: &BoundingBox,
    ) -> Result<SiriEnvelope, FeedError> {
        let url = format!("{}/datafeed/", self.base_url);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/xml, application/json;q=0.5")
            .query(&[
                ("boundingBox", bbox.to_query_value()),
                ("api_key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(FeedError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FeedError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body.chars().take(BODY_EXCERPT_CHARS).collect(),
            });
        }

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("json"));

        let body = response.text().await?;

        if is_json {
            serde_json::from_str(&body).map_err(|e| FeedError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(BODY_EXCERPT_CHARS).collect()),
            })
        } else {
            xml::decode_envelope(&body).map_err(|e| FeedError::Xml {
                message: e.to_string(),
                body: Some(body.chars().take(BODY_EXCERPT_CHARS).collect()),
            })
        }
    }
}
