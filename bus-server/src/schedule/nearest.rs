//! Nearest stop to a coordinate.

use crate::domain::Stop;

use super::error::ScheduleError;
use super::store::ScheduleStore;

/// Default number of candidates fetched from the store before re-ranking.
pub const DEFAULT_CANDIDATES: u32 = 16;

/// The stop closest to (`lat`, `lon`).
///
/// Distance is planar in degree space (see [`Stop::planar_distance_sq`]).
/// The store narrows the search to `candidates` stops, which are then
/// re-ranked here so equal distances always resolve to the lowest ATCO code.
pub async fn nearest_stop<S: ScheduleStore>(
    store: &S,
    lat: f64,
    lon: f64,
    candidates: u32,
) -> Result<Stop, ScheduleError> {
    let stops = store.stops_near(lat, lon, candidates.max(1)).await?;
    closest(stops, lat, lon).ok_or(ScheduleError::NoStopsAvailable)
}

/// Pick the closest stop, breaking ties by lowest ATCO code.
pub fn closest(stops: impl IntoIterator<Item = Stop>, lat: f64, lon: f64) -> Option<Stop> {
    stops.into_iter().min_by(|a, b| {
        a.planar_distance_sq(lat, lon)
            .total_cmp(&b.planar_distance_sq(lat, lon))
            .then_with(|| a.atco_code.cmp(&b.atco_code))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::memory::{MemoryScheduleStore, ScheduleFixture};

    fn stop(atco: &str, lat: f64, lon: f64) -> Stop {
        Stop {
            atco_code: atco.into(),
            naptan_code: None,
            common_name: atco.into(),
            lat,
            lon,
        }
    }

    fn store(stops: Vec<Stop>) -> MemoryScheduleStore {
        MemoryScheduleStore::new(ScheduleFixture {
            stops,
            ..ScheduleFixture::default()
        })
    }

    #[tokio::test]
    async fn picks_closer_stop() {
        let store = store(vec![stop("far", 1.0, 1.0), stop("near", 0.0, 0.0)]);
        let found = nearest_stop(&store, 0.4, 0.4, DEFAULT_CANDIDATES).await.unwrap();
        assert_eq!(found.atco_code, "near");
    }

    #[tokio::test]
    async fn empty_table_is_no_stops_available() {
        let err = nearest_stop(&store(Vec::new()), 50.9, -1.4, DEFAULT_CANDIDATES)
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::NoStopsAvailable));
    }

    #[tokio::test]
    async fn zero_candidates_still_finds_one() {
        let store = store(vec![stop("only", 0.0, 0.0)]);
        let found = nearest_stop(&store, 0.0, 0.0, 0).await.unwrap();
        assert_eq!(found.atco_code, "only");
    }

    #[test]
    fn equal_distance_prefers_lowest_atco() {
        let stops = vec![stop("B", 1.0, 0.0), stop("A", -1.0, 0.0), stop("C", 0.0, 1.0)];
        assert_eq!(closest(stops, 0.0, 0.0).unwrap().atco_code, "A");
    }

    #[test]
    fn closest_of_nothing_is_none() {
        assert!(closest(Vec::new(), 0.0, 0.0).is_none());
    }
}
