//! Geographic bounding boxes for the live vehicle feed.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an invalid bounding box string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid bounding box: {reason}")]
pub struct InvalidBoundingBox {
    reason: &'static str,
}

impl InvalidBoundingBox {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A rectangle in WGS84 degrees.
///
/// The wire form is `minLng,minLat,maxLng,maxLat`, which is both what
/// clients send and what the upstream feed expects. Any `BoundingBox`
/// has finite, in-range coordinates and `min <= max` on both axes.
///
/// # Examples
///
/// ```
/// use bus_server::domain::BoundingBox;
///
/// let bbox = BoundingBox::parse("-1.5,50.88,-1.3,50.95").unwrap();
/// assert_eq!(bbox.min_lon(), -1.5);
/// assert_eq!(bbox.max_lat(), 50.95);
///
/// // Wrong number of values
/// assert!(BoundingBox::parse("1,2,3").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
}

impl BoundingBox {
    /// Southampton and its suburbs.
    pub const SOUTHAMPTON: Self = Self {
        min_lat: 50.88,
        min_lon: -1.5,
        max_lat: 50.95,
        max_lon: -1.3,
    };

    /// Build a bounding box from its corners.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self, InvalidBoundingBox> {
        if ![min_lon, min_lat, max_lon, max_lat].iter().all(|v| v.is_finite()) {
            return Err(InvalidBoundingBox::new("coordinates must be finite numbers"));
        }

        if !(-90.0..=90.0).contains(&min_lat) || !(-90.0..=90.0).contains(&max_lat) {
            return Err(InvalidBoundingBox::new("latitude must be between -90 and 90"));
        }

        if !(-180.0..=180.0).contains(&min_lon) || !(-180.0..=180.0).contains(&max_lon) {
            return Err(InvalidBoundingBox::new(
                "longitude must be between -180 and 180",
            ));
        }

        if min_lat > max_lat || min_lon > max_lon {
            return Err(InvalidBoundingBox::new("minimum corner must not exceed maximum corner"));
        }

        Ok(Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        })
    }

    /// Parse `minLng,minLat,maxLng,maxLat`.
    ///
    /// Whitespace around each value is ignored.
    pub fn parse(s: &str) -> Result<Self, InvalidBoundingBox> {
        let tokens: Vec<&str> = s.split(',').map(str::trim).collect();

        let [min_lon, min_lat, max_lon, max_lat] = tokens.as_slice() else {
            return Err(InvalidBoundingBox::new("expected exactly four comma-separated values"));
        };

        let number = |t: &str| {
            t.parse::<f64>()
                .map_err(|_| InvalidBoundingBox::new("values must be numeric"))
        };

        Self::new(
            number(min_lon)?,
            number(min_lat)?,
            number(max_lon)?,
            number(max_lat)?,
        )
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// The `boundingBox` query value understood by the upstream feed.
    pub fn to_query_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

impl FromStr for BoundingBox {
    type Err = InvalidBoundingBox;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
