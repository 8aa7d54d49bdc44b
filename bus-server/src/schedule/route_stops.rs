//! Stops served by a route.

use std::collections::HashSet;

use crate::domain::Stop;

use super::error::StorageError;
use super::store::ScheduleStore;

/// Distinct stops called at by any journey on `route`, by name then ATCO code.
pub async fn stops_for_route<S: ScheduleStore>(
    store: &S,
    route: &str,
) -> Result<Vec<Stop>, StorageError> {
    let stops = store.stops_on_route(route).await?;
    Ok(distinct_by_atco(stops))
}

fn distinct_by_atco(stops: Vec<Stop>) -> Vec<Stop> {
    let mut seen = HashSet::new();
    let mut stops: Vec<Stop> = stops
        .into_iter()
        .filter(|s| seen.insert(s.atco_code.clone()))
        .collect();
    stops.sort_by(|a, b| {
        a.common_name
            .cmp(&b.common_name)
            .then_with(|| a.atco_code.cmp(&b.atco_code))
    });
    stops
}
