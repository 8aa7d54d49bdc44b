//! Timetable and stop queries.
//!
//! Query functions are generic over [`ScheduleStore`] and own all ordering,
//! de-duplication and window logic, so the PostgreSQL store and the
//! in-memory fixture store answer identically.

mod departures;
mod error;
mod memory;
mod nearest;
mod postgres;
mod resolver;
mod route_stops;
mod store;

pub use departures::{DEFAULT_WINDOW_MINS, select_departures, upcoming_departures};
pub use error::{ScheduleError, StorageError};
pub use memory::{MemoryScheduleStore, ScheduleFixture};
pub use nearest::{DEFAULT_CANDIDATES, closest, nearest_stop};
pub use postgres::{PgScheduleStore, PgStoreConfig};
pub use resolver::{find_by_block_ref, find_by_criteria};
pub use route_stops::stops_for_route;
pub use store::{ScheduleSource, ScheduleStore};
