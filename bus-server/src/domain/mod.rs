//! Domain types for the bus information service.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod bbox;
mod journey;
mod run_days;
mod stop;
mod time;

pub use bbox::{BoundingBox, InvalidBoundingBox};
pub use journey::{Departure, Journey, JourneyCriteria, JourneyStop, StopCall};
pub use run_days::{InvalidRunDays, RunDays};
pub use stop::Stop;
pub use time::{ScheduleTime, TimeError};
