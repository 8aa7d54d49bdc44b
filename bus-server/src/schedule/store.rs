//! The schedule store seam.

use crate::domain::{Journey, JourneyCriteria, RunDays, Stop, StopCall};

use super::error::StorageError;
use super::memory::MemoryScheduleStore;
use super::postgres::PgScheduleStore;

/// Read-only access to timetable and stop reference data.
///
/// Implementations return raw rows; ordering, de-duplication and window
/// filtering are applied by the query functions in this module, so a store
/// may return rows in any order unless stated otherwise.
#[allow(async_fn_in_trait)]
pub trait ScheduleStore {
    /// The journey exactly matching route, departure time, direction and
    /// run days. With several matches, the lowest id wins.
    async fn find_journey(&self, criteria: &JourneyCriteria)
    -> Result<Option<Journey>, StorageError>;

    /// Every journey with this analysed block reference.
    async fn journeys_in_block(&self, block_ref: &str) -> Result<Vec<Journey>, StorageError>;

    /// Every journey calling at the stop that runs on exactly these days,
    /// with its offset at that stop.
    async fn stop_calls(
        &self,
        atco_code: &str,
        run_days: &RunDays,
    ) -> Result<Vec<StopCall>, StorageError>;

    /// Up to `limit` stops closest to the point, nearest first.
    async fn stops_near(&self, lat: f64, lon: f64, limit: u32) -> Result<Vec<Stop>, StorageError>;

    /// Stops called at by any journey on the route (may repeat).
    async fn stops_on_route(&self, route: &str) -> Result<Vec<Stop>, StorageError>;
}

/// The store selected at startup.
#[derive(Debug, Clone)]
pub enum ScheduleSource {
    Postgres(PgScheduleStore),
    Memory(MemoryScheduleStore),
}

impl ScheduleStore for ScheduleSource {
    async fn find_journey(
        &self,
        criteria: &JourneyCriteria,
    ) -> Result<Option<Journey>, StorageError> {
        match self {
            ScheduleSource::Postgres(pg) => pg.find_journey(criteria).await,
            ScheduleSource::Memory(mem) => mem.find_journey(criteria).await,
        }
    }

    async fn journeys_in_block(&self, block_ref: &str) -> Result<Vec<Journey>, StorageError> {
        match self {
            ScheduleSource::Postgres(pg) => pg.journeys_in_block(block_ref).await,
            ScheduleSource::Memory(mem) => mem.journeys_in_block(block_ref).await,
        }
    }

    async fn stop_calls(
        &self,
        atco_code: &str,
        run_days: &RunDays,
    ) -> Result<Vec<StopCall>, StorageError> {
        match self {
            ScheduleSource::Postgres(pg) => pg.stop_calls(atco_code, run_days).await,
            ScheduleSource::Memory(mem) => mem.stop_calls(atco_code, run_days).await,
        }
    }

    async fn stops_near(&self, lat: f64, lon: f64, limit: u32) -> Result<Vec<Stop>, StorageError> {
        match self {
            ScheduleSource::Postgres(pg) => pg.stops_near(lat, lon, limit).await,
            ScheduleSource::Memory(mem) => mem.stops_near(lat, lon, limit).await,
        }
    }

    async fn stops_on_route(&self, route: &str) -> Result<Vec<Stop>, StorageError> {
        match self {
            ScheduleSource::Postgres(pg) => pg.stops_on_route(route).await,
            ScheduleSource::Memory(mem) => mem.stops_on_route(route).await,
        }
    }
}
