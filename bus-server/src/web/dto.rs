//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

/// Query for the live vehicle feed.
#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    /// `minLng,minLat,maxLng,maxLat`; the configured default when absent
    pub bbox: Option<String>,
}

/// Query identifying one journey by its timetable attributes.
#[derive(Debug, Deserialize)]
pub struct BlockQuery {
    pub route: String,

    /// Departure from origin, `HH:MM` or `HH:MM:SS`
    pub departure_time: String,

    pub direction: String,

    /// Run-day tag, e.g. `Mo,Tu,We,Th,Fr`
    pub run_days: String,
}

/// Query for the nearest stop.
#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub lat: f64,
    pub lon: f64,
}

/// Query for upcoming departures at a stop.
#[derive(Debug, Deserialize)]
pub struct DeparturesQuery {
    /// Run-day tag to match
    pub run_days: String,

    /// Look-ahead in minutes (defaults to the configured window)
    pub window_mins: Option<u32>,

    /// Time in HH:MM format (defaults to now)
    pub time: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// SQLSTATE or similar code for operators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
