//! Mock vehicle feed for running without BODS credentials.
//!
//! Serves a fixed SIRI envelope loaded from a JSON or XML file as if it
//! were the live datafeed.

use std::path::Path;
use std::sync::Arc;

use crate::domain::BoundingBox;

use super::error::FeedError;
use super::types::SiriEnvelope;
use super::xml;

/// Mock feed that serves one envelope from disk.
#[derive(Debug, Clone)]
pub struct MockFeed {
    envelope: Arc<SiriEnvelope>,
}

impl MockFeed {
    /// Load the envelope from a file. Content starting with `<` is read as
    /// SIRI-VM XML, anything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref();

        let raw = std::fs::read_to_string(path)
            .map_err(|e| FeedError::Mock(format!("failed to read {}: {e}", path.display())))?;

        let envelope = if raw.trim_start().starts_with('<') {
            xml::decode_envelope(&raw).map_err(|e| e.to_string())
        } else {
            serde_json::from_str::<SiriEnvelope>(&raw).map_err(|e| e.to_string())
        }
        .map_err(|e| FeedError::Mock(format!("failed to parse {}: {e}", path.display())))?;

        Ok(Self::from_envelope(envelope))
    }

    /// Serve an in-memory envelope.
    pub fn from_envelope(envelope: SiriEnvelope) -> Self {
        Self {
            envelope: Arc::new(envelope),
        }
    }

    /// Mimics `BodsClient::fetch_vehicle_locations`.
    ///
    /// The bounding box is ignored - mock data is static.
    pub async fn fetch_vehicle_locations(
        &self,
        _bbox: &BoundingBox,
    ) -> Result<SiriEnvelope, FeedError> {
        Ok(self.envelope.as_ref().clone())
    }
}
