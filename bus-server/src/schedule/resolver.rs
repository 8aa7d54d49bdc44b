//! Block reference resolution.
//!
//! A block is the run of journeys one vehicle works back-to-back. Given a
//! journey's public timetable attributes we find its block and return the
//! whole duty in departure order.

use tracing::debug;

use crate::domain::{Journey, JourneyCriteria};

use super::error::{ScheduleError, StorageError};
use super::store::ScheduleStore;

/// Find the journey matching `criteria`, then every journey in its block.
///
/// No matching journey yields an empty list. A matching journey without a
/// block reference yields just that journey. An unreadable departure time
/// is reported as [`ScheduleError::InvalidTimeFormat`].
pub async fn find_by_criteria<S: ScheduleStore>(
    store: &S,
    criteria: &JourneyCriteria,
) -> Result<Vec<Journey>, ScheduleError> {
    let Some(journey) = store
        .find_journey(criteria)
        .await
        .map_err(ScheduleError::classify)?
    else {
        debug!(
            route = %criteria.route,
            departure_time = %criteria.departure_time,
            "no journey matches"
        );
        return Ok(Vec::new());
    };

    let Some(block_ref) = journey.analysed_block_ref.clone() else {
        debug!(journey_id = journey.id, "journey has no block reference");
        return Ok(vec![journey]);
    };

    Ok(find_by_block_ref(store, &block_ref).await?)
}

/// Every journey in the block, ordered by departure time then id.
pub async fn find_by_block_ref<S: ScheduleStore>(
    store: &S,
    block_ref: &str,
) -> Result<Vec<Journey>, StorageError> {
    let mut journeys = store.journeys_in_block(block_ref).await?;
    journeys.sort_by(Journey::departure_order);
    Ok(journeys)
}
