//! Adif station portal client.
//!
//! The portal has no public API. Departure boards are loaded by the station
//! page's own JavaScript, so we replay what a browser does:
//!
//! - GET the station page `<base>/<code>-<slug>`, which sets session cookies
//!   and embeds a short-lived `p_p_auth` token in its links
//! - POST the board query back to the same page with that token, the session
//!   cookies and a matching `Referer`
//!
//! The token is only good for the session that fetched it, so each attempt
//! opens a fresh session.

mod client;
mod error;
mod token;
mod types;

pub use client::{AdifConfig, AdifPortal, AdifSession};
pub use error::AdifError;
pub use token::{AuthToken, extract_auth_token};
pub use types::{DepartureRecord, parse_schedule};
