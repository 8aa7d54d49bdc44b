//! The vehicle feed seam.

use crate::domain::BoundingBox;

use super::client::BodsClient;
use super::error::FeedError;
use super::mock::MockFeed;
use super::types::SiriEnvelope;

/// Anything that can answer "which vehicles are in this box".
///
/// This abstraction lets the live gateway be tested without the network.
#[allow(async_fn_in_trait)]
pub trait VehicleFeed {
    async fn fetch_vehicle_locations(&self, bbox: &BoundingBox)
    -> Result<SiriEnvelope, FeedError>;
}

/// The feed selected at startup.
#[derive(Debug, Clone)]
pub enum FeedSource {
    Bods(BodsClient),
    Mock(MockFeed),
}

impl VehicleFeed for FeedSource {
    async fn fetch_vehicle_locations(
        &self,
        bbox: &BoundingBox,
    ) -> Result<SiriEnvelope, FeedError> {
        match self {
            FeedSource::Bods(client) => client.fetch_vehicle_locations(bbox).await,
            FeedSource::Mock(mock) => mock.fetch_vehicle_locations(bbox).await,
        }
    }
}
