//! Bus stops.

use serde::{Deserialize, Serialize};

/// A stop from the national stop reference data.
///
/// `atco_code` is the primary key; `naptan_code` is the short code printed
/// on the flag, which some stops lack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub atco_code: String,
    pub naptan_code: Option<String>,
    pub common_name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Stop {
    /// Squared planar distance in degree space.
    ///
    /// This treats latitude and longitude as a flat grid. It ranks stops
    /// correctly only over small areas; a degree of longitude shrinks with
    /// latitude, so east-west distances are overweighted away from the
    /// equator.
    pub fn planar_distance_sq(&self, lat: f64, lon: f64) -> f64 {
        let d_lat = self.lat - lat;
        let d_lon = self.lon - lon;
        d_lat * d_lat + d_lon * d_lon
    }
}
