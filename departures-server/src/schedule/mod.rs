//! Departure schedule fetching.
//!
//! Ties the portal client to the retry policy and the board ordering:
//!
//! - [`portal`] is the seam to the upstream (a session that can acquire a
//!   token and query a board)
//! - [`fetcher`] runs the attempt / retry loop and classifies the result
//! - [`rank`] orders mixed "N min" and "HH:MM" entries

mod config;
mod error;
mod fetcher;
mod portal;
mod rank;

pub use config::{EmptyPolicy, FetchConfig};
pub use error::ScheduleError;
pub use fetcher::{FetchOutcome, ScheduleFetcher};
pub use portal::{Portal, PortalSession};
pub use rank::{rank, sort_departures};
