//! Scheduled journeys and the departures derived from them.

use serde::{Deserialize, Serialize};

use super::{RunDays, ScheduleTime};

/// One scheduled vehicle journey on a route.
///
/// `analysed_block_ref` groups the journeys worked back-to-back by the same
/// vehicle, so it is the link between "the 08:00 from X" and what that bus
/// does next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    pub id: i64,
    pub route: String,
    pub departure_time: ScheduleTime,
    pub direction: String,
    pub run_days: RunDays,
    pub analysed_block_ref: Option<String>,
    pub origin_stop_id: String,
    pub destination_stop_id: String,
}

impl Journey {
    /// Canonical ordering within a block: departure time, then id.
    pub fn departure_order(a: &Journey, b: &Journey) -> std::cmp::Ordering {
        a.departure_time
            .cmp(&b.departure_time)
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// One entry in a journey's stop sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyStop {
    pub journey_id: i64,
    pub stop_id: String,
    /// Seconds after the journey's departure.
    pub relative_offset_secs: i64,
}

/// A journey together with its timing at one particular stop.
#[derive(Debug, Clone, PartialEq)]
pub struct StopCall {
    pub journey: Journey,
    /// Seconds after the journey's departure that it reaches the stop.
    pub relative_offset_secs: i64,
}

impl StopCall {
    /// When the journey is at this stop, or `None` if the offset is
    /// nonsensical (before midnight of the service day).
    pub fn actual_time(&self) -> Option<ScheduleTime> {
        self.journey
            .departure_time
            .checked_add_secs(self.relative_offset_secs)
    }
}

/// A departure from a stop inside the look-ahead window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Departure {
    /// The journey's departure time from its origin.
    pub scheduled_time: ScheduleTime,
    /// The time the journey is due at this stop.
    pub actual_time: ScheduleTime,
    pub route: String,
    pub journey_code: i64,
    pub analysed_block_ref: Option<String>,
    pub origin: String,
    pub destination: String,
}

impl Departure {
    pub(crate) fn new(call: &StopCall, actual_time: ScheduleTime) -> Self {
        let journey = &call.journey;
        Self {
            scheduled_time: journey.departure_time,
            actual_time,
            route: journey.route.clone(),
            journey_code: journey.id,
            analysed_block_ref: journey.analysed_block_ref.clone(),
            origin: journey.origin_stop_id.clone(),
            destination: journey.destination_stop_id.clone(),
        }
    }
}

/// Identifies a single journey by its public timetable attributes.
///
/// `departure_time` stays as the caller's raw text: the schedule store
/// interprets it and reports literals it cannot read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyCriteria {
    pub route: String,
    pub departure_time: String,
    pub direction: String,
    pub run_days: RunDays,
}
