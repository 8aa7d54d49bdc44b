//! In-memory schedule store for running without a database.
//!
//! Loads a JSON fixture of stops, journeys and journey stops. Rows come back
//! in fixture order, like an unordered SQL query, so ordering and
//! de-duplication stay the job of the query functions.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{Journey, JourneyCriteria, JourneyStop, RunDays, ScheduleTime, Stop, StopCall};

use super::error::StorageError;
use super::store::ScheduleStore;

/// Fixture file layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleFixture {
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub journeys: Vec<Journey>,
    #[serde(default)]
    pub journey_stops: Vec<JourneyStop>,
}

/// Schedule store over a fixed in-memory data set.
#[derive(Debug, Clone, Default)]
pub struct MemoryScheduleStore {
    data: Arc<ScheduleFixture>,
}

impl MemoryScheduleStore {
    pub fn new(fixture: ScheduleFixture) -> Self {
        Self {
            data: Arc::new(fixture),
        }
    }

    /// Load a fixture from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|e| {
            StorageError::Unavailable(format!("failed to read {}: {e}", path.display()))
        })?;

        let fixture: ScheduleFixture = serde_json::from_str(&json)
            .map_err(|e| StorageError::Decode(format!("failed to parse {}: {e}", path.display())))?;

        Ok(Self::new(fixture))
    }

    fn journey(&self, id: i64) -> Option<&Journey> {
        self.data.journeys.iter().find(|j| j.id == id)
    }

    fn stop(&self, atco_code: &str) -> Option<&Stop> {
        self.data.stops.iter().find(|s| s.atco_code == atco_code)
    }
}

impl ScheduleStore for MemoryScheduleStore {
    async fn find_journey(
        &self,
        criteria: &JourneyCriteria,
    ) -> Result<Option<Journey>, StorageError> {
        // Same failure the database reports for an unreadable time literal.
        let departure_time = ScheduleTime::parse_sql_literal(&criteria.departure_time).map_err(|e| {
            StorageError::time_format(format!("{e}: \"{}\"", criteria.departure_time))
        })?;
        let Some(departure_time) = departure_time else {
            return Ok(None);
        };

        Ok(self
            .data
            .journeys
            .iter()
            .filter(|j| {
                j.route == criteria.route
                    && j.departure_time == departure_time
                    && j.direction == criteria.direction
                    && j.run_days.matches(&criteria.run_days)
            })
            .min_by_key(|j| j.id)
            .cloned())
    }

    async fn journeys_in_block(&self, block_ref: &str) -> Result<Vec<Journey>, StorageError> {
        Ok(self
            .data
            .journeys
            .iter()
            .filter(|j| j.analysed_block_ref.as_deref() == Some(block_ref))
            .cloned()
            .collect())
    }

    async fn stop_calls(
        &self,
        atco_code: &str,
        run_days: &RunDays,
    ) -> Result<Vec<StopCall>, StorageError> {
        Ok(self
            .data
            .journey_stops
            .iter()
            .filter(|js| js.stop_id == atco_code)
            .filter_map(|js| {
                let journey = self.journey(js.journey_id)?;
                journey.run_days.matches(run_days).then(|| StopCall {
                    journey: journey.clone(),
                    relative_offset_secs: js.relative_offset_secs,
                })
            })
            .collect())
    }

    async fn stops_near(&self, lat: f64, lon: f64, limit: u32) -> Result<Vec<Stop>, StorageError> {
        let mut stops = self.data.stops.clone();
        stops.sort_by(|a, b| {
            a.planar_distance_sq(lat, lon)
                .total_cmp(&b.planar_distance_sq(lat, lon))
                .then_with(|| a.atco_code.cmp(&b.atco_code))
        });
        stops.truncate(limit as usize);
        Ok(stops)
    }

    async fn stops_on_route(&self, route: &str) -> Result<Vec<Stop>, StorageError> {
        Ok(self
            .data
            .journey_stops
            .iter()
            .filter(|js| {
                self.journey(js.journey_id)
                    .is_some_and(|j| j.route == route)
            })
            .filter_map(|js| self.stop(&js.stop_id).cloned())
            .collect())
    }
}
