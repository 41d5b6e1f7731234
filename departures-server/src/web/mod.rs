//! Web layer for the departures service.
//!
//! Exposes the schedule fetcher to the front-end, which is hosted on a
//! different origin.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
