//! Run-day pattern tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a run-day tag is empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid run days: must not be empty")]
pub struct InvalidRunDays;

/// The weekday tag a journey runs on, e.g. `Mo,Tu,We,Th,Fr`.
///
/// This is a label, not a calendar: two patterns match only when their
/// text is identical. `Mo,Tu` and `Tu,Mo` are different tags.
///
/// # Examples
///
/// ```
/// use bus_server::domain::RunDays;
///
/// let weekdays = RunDays::parse("Mo,Tu,We,Th,Fr").unwrap();
/// assert!(weekdays.matches(&RunDays::parse("Mo,Tu,We,Th,Fr").unwrap()));
/// assert!(!weekdays.matches(&RunDays::parse("Tu,Mo,We,Th,Fr").unwrap()));
/// assert!(RunDays::parse("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunDays(String);

impl RunDays {
    /// Accept any non-blank tag, verbatim.
    pub fn parse(s: &str) -> Result<Self, InvalidRunDays> {
        if s.trim().is_empty() {
            return Err(InvalidRunDays);
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact tag equality.
    pub fn matches(&self, other: &RunDays) -> bool {
        self.0 == other.0
    }
}

impl TryFrom<String> for RunDays {
    type Error = InvalidRunDays;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.trim().is_empty() {
            return Err(InvalidRunDays);
        }
        Ok(Self(s))
    }
}

impl From<RunDays> for String {
    fn from(days: RunDays) -> Self {
        days.0
    }
}

impl fmt::Display for RunDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
