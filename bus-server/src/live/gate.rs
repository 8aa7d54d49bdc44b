//! Minimum-interval gate in front of the upstream feed.
//!
//! The whole service shares one upstream budget, so there is exactly one
//! gate, constructed at startup and handed to every request. Whatever the
//! client traffic looks like, at most one caller per interval is let
//! through to the provider; everyone else is told how long to wait.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default minimum time between upstream fetches.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

/// Outcome of asking the gate for permission to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Caller may fetch; the gate has recorded this instant.
    Admitted,
    /// Too soon; try again after this many whole seconds.
    Rejected { retry_after_secs: u64 },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Shared single-flight gate.
///
/// The check and the update of the last-fetch instant happen under one
/// lock, so concurrent callers see a linearizable history: of any number
/// of simultaneous calls inside one interval, exactly one is admitted.
#[derive(Debug)]
pub struct FeedGate {
    interval: Duration,
    /// `None` until the first admission, so the first caller always passes.
    last_fetch_at: Mutex<Option<Instant>>,
}

impl FeedGate {
    /// Create a gate with the given minimum interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fetch_at: Mutex::new(None),
        }
    }

    /// The configured minimum interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide whether a fetch may start at `now`.
    ///
    /// Admission requires strictly more than the interval to have elapsed
    /// since the last admission, measured in whole milliseconds. On
    /// admission `now` becomes the new last-fetch instant; a rejection
    /// leaves the gate untouched. An instant earlier than the recorded one
    /// counts as zero elapsed time.
    pub fn admit(&self, now: Instant) -> Admission {
        let mut last = self.last_fetch_at.lock();

        let Some(previous) = *last else {
            *last = Some(now);
            return Admission::Admitted;
        };

        let elapsed_ms = now.saturating_duration_since(previous).as_millis();
        let interval_ms = self.interval.as_millis();

        if elapsed_ms > interval_ms {
            *last = Some(now);
            return Admission::Admitted;
        }

        let remaining_ms = interval_ms - elapsed_ms;
        let retry_after_secs = u64::try_from(remaining_ms.div_ceil(1000)).unwrap_or(u64::MAX);
        Admission::Rejected { retry_after_secs }
    }

    /// The instant of the most recent admission, if any.
    pub fn last_fetch_at(&self) -> Option<Instant> {
        *self.last_fetch_at.lock()
    }
}

impl Default for FeedGate {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}
