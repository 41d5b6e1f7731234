//! Upstream abstraction for the fetcher.

use std::future::Future;

use crate::adif::{AdifError, AuthToken};
use crate::registry::StationEntry;

/// Something that can open browsing sessions for a station.
pub trait Portal: Send + Sync {
    type Session: PortalSession + Send;

    /// Start a fresh session with no cookies and no token.
    fn open_session(&self, station: &StationEntry) -> Result<Self::Session, AdifError>;
}

/// A single session's view of the portal.
///
/// A token is only valid within the session that acquired it.
pub trait PortalSession {
    /// Load the station page and pull the auth token out of it.
    fn acquire_token(&mut self) -> impl Future<Output = Result<AuthToken, AdifError>> + Send;

    /// Query the departure board, returning the raw response body.
    fn query_departures(
        &mut self,
        token: &AuthToken,
        traffic_value: &str,
    ) -> impl Future<Output = Result<String, AdifError>> + Send;
}
