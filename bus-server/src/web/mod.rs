//! Web layer for the bus information service.
//!
//! Thin JSON transport over the live feed gateway and the schedule queries.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
