//! Live vehicle positions.
//!
//! Shields the rate-limited upstream feed from bursty client traffic: a
//! shared gate lets through at most one upstream call per interval and
//! tells everyone else when to come back.

mod gate;
mod service;

pub use gate::{Admission, DEFAULT_INTERVAL, FeedGate};
pub use service::{LiveFeed, LiveFeedError};
