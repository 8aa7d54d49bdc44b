//! Live vehicle positions behind the feed gate.

use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::bods::{FeedError, VehicleActivity, VehicleFeed, project};
use crate::domain::BoundingBox;

use super::gate::{Admission, FeedGate};

/// Why a live feed request produced no vehicles.
#[derive(Debug, thiserror::Error)]
pub enum LiveFeedError {
    /// The gate turned the request away; the client should come back later.
    #[error("upstream fetched too recently, retry in {retry_after_secs} seconds")]
    Rejected { retry_after_secs: u64 },

    /// The upstream call failed or returned an unusable envelope.
    #[error("upstream feed failed: {0}")]
    Upstream(#[from] FeedError),
}

/// The live feed gateway: one gate, one upstream.
///
/// The gate records the admission *before* the upstream call starts, so a
/// fetch that fails still uses up its interval. Callers arriving during
/// that interval are rejected even though nobody got data. The lock is held
/// only for the admit decision, never across the network call, so a slow
/// upstream does not serialise other requests behind it.
#[derive(Debug)]
pub struct LiveFeed<F> {
    gate: FeedGate,
    upstream: F,
}

impl<F: VehicleFeed> LiveFeed<F> {
    pub fn new(gate: FeedGate, upstream: F) -> Self {
        Self { gate, upstream }
    }

    /// Fetch vehicles inside `bbox`, if the gate allows a fetch at `now`.
    pub async fn fetch(
        &self,
        bbox: &BoundingBox,
        now: Instant,
    ) -> Result<Vec<VehicleActivity>, LiveFeedError> {
        if let Admission::Rejected { retry_after_secs } = self.gate.admit(now) {
            debug!(retry_after_secs, "live feed request throttled");
            return Err(LiveFeedError::Rejected { retry_after_secs });
        }

        let envelope = match self.upstream.fetch_vehicle_locations(bbox).await {
            Ok(envelope) => envelope,
            Err(e) if e.is_auth() => {
                error!(error = %e, "vehicle feed rejected the API key");
                return Err(e.into());
            }
            Err(e) => {
                warn!(error = %e, %bbox, "vehicle feed fetch failed");
                return Err(e.into());
            }
        };

        let activities = project(envelope).map_err(|e| {
            warn!(error = %e, %bbox, "vehicle feed returned a malformed envelope");
            FeedError::from(e)
        })?;

        info!(vehicles = activities.len(), %bbox, "fetched live vehicle positions");
        Ok(activities)
    }

    pub fn gate(&self) -> &FeedGate {
        &self.gate
    }

    pub fn upstream(&self) -> &F {
        &self.upstream
    }
}
