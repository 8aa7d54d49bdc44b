//! Timetable times.
//!
//! Schedules give times of day ("08:00" or "08:00:00") plus per-stop offsets
//! in seconds. A journey that leaves at 23:50 and reaches a stop 20 minutes
//! later arrives at "24:10" on the same service day, so times here are plain
//! seconds after midnight and are allowed to run past 24:00.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const SECS_PER_DAY: u32 = 24 * 60 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time on a service day, in seconds after midnight.
///
/// # Examples
///
/// ```
/// use bus_server::domain::ScheduleTime;
///
/// let t = ScheduleTime::parse("08:00").unwrap();
/// assert_eq!(t.to_string(), "08:00:00");
///
/// let later = t.checked_add_secs(600).unwrap();
/// assert_eq!(later.to_string(), "08:10:00");
///
/// assert!(ScheduleTime::parse("25:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleTime(u32);

impl ScheduleTime {
    /// Midnight at the start of the service day.
    pub const MIDNIGHT: Self = Self(0);

    /// Create a time from seconds after midnight.
    pub fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    /// Create a time from wall-clock components.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self(hour * 3600 + minute * 60 + second))
    }

    /// Parse `HH:MM` or `HH:MM:SS` (a wall-clock time, so at most 23:59:59).
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.split(':');

        let hour = parts
            .next()
            .and_then(parse_two_digits)
            .ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parts
            .next()
            .and_then(parse_two_digits)
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        let second = match parts.next() {
            Some(p) => parse_two_digits(p).ok_or_else(|| TimeError::new("invalid second digits"))?,
            None => 0,
        };

        if parts.next().is_some() {
            return Err(TimeError::new("expected HH:MM or HH:MM:SS"));
        }

        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        Ok(Self(hour * 3600 + minute * 60 + second))
    }

    /// Parse a time literal as a PostgreSQL `time` column reads it: a one
    /// or two digit hour, optional seconds with a fractional part, and
    /// `24:00:00` as the end of the day.
    ///
    /// `Ok(None)` is a valid literal with a nonzero fraction of a second,
    /// which no whole-second time equals.
    pub fn parse_sql_literal(s: &str) -> Result<Option<Self>, TimeError> {
        let mut parts = s.trim().split(':');

        let hour = parts
            .next()
            .and_then(|p| parse_digits(p, 2))
            .ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parts
            .next()
            .and_then(|p| parse_digits(p, 2))
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        let (second, fractional) = match parts.next() {
            Some(p) => {
                let (whole, fraction) = match p.split_once('.') {
                    Some((_, "")) => return Err(TimeError::new("invalid fractional seconds")),
                    Some(split) => split,
                    None => (p, ""),
                };
                if !fraction.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(TimeError::new("invalid fractional seconds"));
                }
                let second =
                    parse_digits(whole, 2).ok_or_else(|| TimeError::new("invalid second digits"))?;
                (second, fraction.bytes().any(|b| b != b'0'))
            }
            None => (0, false),
        };
        if parts.next().is_some() {
            return Err(TimeError::new("expected HH:MM or HH:MM:SS"));
        }

        if minute > 59 || second > 59 {
            return Err(TimeError::new("minute and second must be 0-59"));
        }
        if hour > 24 || (hour == 24 && (minute, second, fractional) != (0, 0, false)) {
            return Err(TimeError::new("time must be 00:00:00-24:00:00"));
        }

        Ok((!fractional).then_some(Self(hour * 3600 + minute * 60 + second)))
    }

    /// Seconds after midnight.
    pub fn as_secs(&self) -> u32 {
        self.0
    }

    /// Add a signed offset, failing if the result would precede midnight.
    pub fn checked_add_secs(&self, secs: i64) -> Option<Self> {
        let total = i64::from(self.0).checked_add(secs)?;
        u32::try_from(total).ok().map(Self)
    }

    /// Whether this time lies past the end of the service day.
    pub fn is_past_midnight(&self) -> bool {
        self.0 >= SECS_PER_DAY
    }
}

impl From<NaiveTime> for ScheduleTime {
    fn from(t: NaiveTime) -> Self {
        Self(t.num_seconds_from_midnight())
    }
}

impl FromStr for ScheduleTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScheduleTime({self})")
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0 / 3600,
            (self.0 / 60) % 60,
            self.0 % 60
        )
    }
}

impl Serialize for ScheduleTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScheduleTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse exactly two ASCII digits.
fn parse_two_digits(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// Parse one to `max_len` ASCII digits.
fn parse_digits(s: &str, max_len: usize) -> Option<u32> {
    if s.is_empty() || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Display then parse is the identity for wall-clock times.
        #[test]
        fn roundtrip(h in 0u32..24, m in 0u32..60, s in 0u32..60) {
            let t = ScheduleTime::from_hms(h, m, s).unwrap();
            prop_assert_eq!(ScheduleTime::parse(&t.to_string()).unwrap(), t);
        }

        /// Adding an offset preserves ordering.
        #[test]
        fn add_is_monotonic(base in 0u32..86_400, offset in 0i64..7_200) {
            let t = ScheduleTime::from_secs(base);
            prop_assert!(t.checked_add_secs(offset).unwrap() >= t);
        }
    }
}
