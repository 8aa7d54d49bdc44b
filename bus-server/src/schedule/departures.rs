//! Upcoming departures at a stop.

use crate::domain::{Departure, RunDays, ScheduleTime, StopCall};

use super::error::StorageError;
use super::store::ScheduleStore;

/// Default look-ahead window in minutes.
pub const DEFAULT_WINDOW_MINS: u32 = 30;

/// Departures from `atco_code` due within `window_mins` of `now`.
///
/// A journey is due at the stop at its departure time plus the stop's
/// offset. The window is inclusive at both ends and does not wrap past
/// midnight.
pub async fn upcoming_departures<S: ScheduleStore>(
    store: &S,
    atco_code: &str,
    run_days: &RunDays,
    now: ScheduleTime,
    window_mins: u32,
) -> Result<Vec<Departure>, StorageError> {
    let calls = store.stop_calls(atco_code, run_days).await?;
    Ok(select_departures(&calls, now, window_mins))
}

/// Filter and order stop calls into departures.
///
/// Ordered by time at the stop, then route, then journey id.
pub fn select_departures(calls: &[StopCall], now: ScheduleTime, window_mins: u32) -> Vec<Departure> {
    let window_secs = i64::from(window_mins) * 60;
    let end = now.checked_add_secs(window_secs).unwrap_or(now);

    let mut departures: Vec<Departure> = calls
        .iter()
        .filter_map(|call| {
            let actual = call.actual_time()?;
            (now <= actual && actual <= end).then(|| Departure::new(call, actual))
        })
        .collect();

    departures.sort_by(|a, b| {
        a.actual_time
            .cmp(&b.actual_time)
            .then_with(|| a.route.cmp(&b.route))
            .then_with(|| a.journey_code.cmp(&b.journey_code))
    });
    departures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Journey;
    use proptest::prelude::*;

    fn call(id: i64, route: &str, dep: &str, offset: i64) -> StopCall {
        StopCall {
            journey: Journey {
                id,
                route: route.into(),
                departure_time: ScheduleTime::parse(dep).unwrap(),
                direction: "outbound".into(),
                run_days: RunDays::parse("Mo,Tu,We,Th,Fr").unwrap(),
                analysed_block_ref: None,
                origin_stop_id: "O".into(),
                destination_stop_id: "D".into(),
            },
            relative_offset_secs: offset,
        }
    }

    fn at(s: &str) -> ScheduleTime {
        ScheduleTime::parse(s).unwrap()
    }

    #[test]
    fn offset_departure_inside_window() {
        let calls = [call(1, "U1", "08:00", 600)];
        let deps = select_departures(&calls, at("08:05"), 30);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].actual_time, at("08:10"));
        assert_eq!(deps[0].scheduled_time, at("08:00"));
    }

    #[test]
    fn offset_departure_already_gone() {
        let calls = [call(1, "U1", "08:00", 600)];
        assert!(select_departures(&calls, at("08:41"), 30).is_empty());
    }

    #[test]
    fn window_is_inclusive_at_both_ends() {
        let calls = [call(1, "U1", "08:05", 0), call(2, "U1", "08:35", 0)];
        let deps = select_departures(&calls, at("08:05"), 30);
        assert_eq!(deps.len(), 2);

        assert!(select_departures(&[call(3, "U1", "08:35", 1)], at("08:05"), 30).is_empty());
    }

    #[test]
    fn ordered_by_time_then_route_then_id() {
        let calls = [
            call(4, "U2", "08:10", 0),
            call(3, "U1", "08:10", 0),
            call(2, "U1", "08:10", 0),
            call(1, "U9", "08:00", 300),
        ];
        let deps = select_departures(&calls, at("08:00"), 30);
        let order: Vec<_> = deps.iter().map(|d| d.journey_code).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[test]
    fn late_evening_does_not_wrap_to_morning() {
        let calls = [call(1, "U1", "00:05", 0), call(2, "U1", "23:50", 1200)];
        let deps = select_departures(&calls, at("23:45"), 30);
        let order: Vec<_> = deps.iter().map(|d| d.journey_code).collect();
        assert_eq!(order, vec![2]);
        assert!(deps[0].actual_time.is_past_midnight());
    }

    #[test]
    fn negative_offset_before_midnight_is_skipped() {
        let calls = [call(1, "U1", "00:00", -60)];
        assert!(select_departures(&calls, ScheduleTime::MIDNIGHT, 30).is_empty());
    }

    proptest! {
        #[test]
        fn every_departure_lies_in_window(
            now in 0u32..86_400,
            window in 1u32..240,
            entries in prop::collection::vec((0u32..86_400, 0i64..7_200), 0..20),
        ) {
            let calls: Vec<_> = entries
                .iter()
                .enumerate()
                .map(|(i, (dep, offset))| {
                    let mut c = call(i as i64, "U1", "00:00", *offset);
                    c.journey.departure_time = ScheduleTime::from_secs(*dep);
                    c
                })
                .collect();

            let now = ScheduleTime::from_secs(now);
            let deps = select_departures(&calls, now, window);
            let end = now.as_secs() + window * 60;

            for d in &deps {
                prop_assert!(d.actual_time >= now);
                prop_assert!(d.actual_time.as_secs() <= end);
            }
            for pair in deps.windows(2) {
                prop_assert!(pair[0].actual_time <= pair[1].actual_time);
            }
        }
    }
}
