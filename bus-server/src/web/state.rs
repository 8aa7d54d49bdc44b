//! Application state for the web layer.

use std::sync::Arc;

use crate::bods::FeedSource;
use crate::config::ServerConfig;
use crate::live::LiveFeed;
use crate::schedule::ScheduleSource;

/// Shared application state.
///
/// Contains all the services needed to handle requests. The live feed holds
/// the one gate every request shares.
#[derive(Clone)]
pub struct AppState {
    /// Rate-limited live vehicle feed
    pub live: Arc<LiveFeed<FeedSource>>,

    /// Timetable and stop data
    pub schedule: Arc<ScheduleSource>,

    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(live: LiveFeed<FeedSource>, schedule: ScheduleSource, config: ServerConfig) -> Self {
        Self {
            live: Arc::new(live),
            schedule: Arc::new(schedule),
            config: Arc::new(config),
        }
    }
}
