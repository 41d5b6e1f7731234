//! The attempt / retry loop.
//!
//! One attempt is: open a session, acquire a token, query the board with
//! that token, parse. Attempts never share a session or a token. Between
//! failed attempts the fetcher pauses for a fixed delay.
//!
//! Failures are classified as:
//!
//! - transient (network, bad status, missing token, empty board): retried
//!   until the attempt budget runs out, then [`ScheduleError::ExhaustedRetries`]
//! - malformed payload: reported at once as [`ScheduleError::MalformedResponse`]
//! - unusable portal settings: reported at once as [`ScheduleError::Misconfigured`]

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::adif::{AdifError, DepartureRecord, parse_schedule};
use crate::registry::{Registry, StationEntry};

use super::config::{EmptyPolicy, FetchConfig};
use super::error::ScheduleError;
use super::portal::{Portal, PortalSession};
use super::rank::sort_departures;

/// Result of fetching a station's departures.
///
/// "No trains right now" and "could not get an answer" are different
/// outcomes and stay different all the way to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Departures, soonest first.
    Success(Vec<DepartureRecord>),
    /// The portal answered with an empty board.
    EmptySuccess,
    /// No answer could be obtained.
    Failure(ScheduleError),
}

/// Fetches departure boards, retrying through portal hiccups.
pub struct ScheduleFetcher<P> {
    portal: P,
    registry: Arc<Registry>,
    config: FetchConfig,
    clock: fn() -> NaiveDateTime,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<P: Portal> ScheduleFetcher<P> {
    pub fn new(portal: P, registry: Arc<Registry>, config: FetchConfig) -> Self {
        Self {
            portal,
            registry,
            config,
            clock: local_now,
            shutdown: None,
        }
    }

    /// Replace the source of "now" used to order departures.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Abort pending retries once `shutdown` becomes `true`.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Fetch departures for a station code and traffic-type key.
    ///
    /// Unknown keys fail with [`ScheduleError::Validation`] before any
    /// request is made.
    pub async fn fetch(&self, station_code: &str, traffic_key: &str) -> FetchOutcome {
        let station = match self.registry.resolve_station(station_code) {
            Ok(station) => station,
            Err(e) => return FetchOutcome::Failure(e.into()),
        };
        let traffic = match self.registry.resolve_traffic(traffic_key) {
            Ok(traffic) => traffic,
            Err(e) => return FetchOutcome::Failure(e.into()),
        };

        self.fetch_schedule(station, &traffic.value).await
    }

    /// Fetch departures for a resolved station and the portal's traffic value.
    pub async fn fetch_schedule(
        &self,
        station: &StationEntry,
        traffic_value: &str,
    ) -> FetchOutcome {
        let max_attempts = self.config.max_retries;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            info!(
                station = %station.code,
                traffic = traffic_value,
                attempt,
                max_attempts,
                "requesting departures"
            );

            match self.attempt(station, traffic_value).await {
                Ok(departures) if !departures.is_empty() => {
                    info!(
                        station = %station.code,
                        count = departures.len(),
                        attempt,
                        "departures fetched"
                    );
                    return FetchOutcome::Success(departures);
                }
                Ok(_) if self.config.empty_policy == EmptyPolicy::Accept => {
                    info!(station = %station.code, attempt, "portal listed no departures");
                    return FetchOutcome::EmptySuccess;
                }
                Ok(_) => {
                    warn!(station = %station.code, attempt, "portal listed no departures");
                    last_error = Some("portal listed no departures".to_string());
                }
                Err(e) if e.is_malformed() => {
                    error!(
                        station = %station.code,
                        attempt,
                        error = %e,
                        "giving up on malformed response"
                    );
                    return FetchOutcome::Failure(ScheduleError::MalformedResponse {
                        reason: e.to_string(),
                    });
                }
                Err(e) if e.is_misconfiguration() => {
                    error!(station = %station.code, error = %e, "portal client is misconfigured");
                    return FetchOutcome::Failure(ScheduleError::Misconfigured {
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!(station = %station.code, attempt, error = %e, "attempt failed");
                    last_error = Some(e.to_string());
                }
            }

            if attempt < max_attempts {
                if let Err(e) = self.pause().await {
                    warn!(station = %station.code, attempt, "retry wait interrupted");
                    return FetchOutcome::Failure(e);
                }
            }
        }

        error!(
            station = %station.code,
            traffic = traffic_value,
            attempts = max_attempts,
            "no departures obtained"
        );
        FetchOutcome::Failure(ScheduleError::ExhaustedRetries {
            attempts: max_attempts,
            last_error: last_error.unwrap_or_else(|| "no attempt was made".to_string()),
        })
    }

    /// One token + board round trip on a fresh session.
    ///
    /// The session is dropped on return, whatever the outcome.
    async fn attempt(
        &self,
        station: &StationEntry,
        traffic_value: &str,
    ) -> Result<Vec<DepartureRecord>, AdifError> {
        let mut session = self.portal.open_session(station)?;
        let token = session.acquire_token().await?;
        let body = session.query_departures(&token, traffic_value).await?;

        let mut departures = parse_schedule(&body)?;
        if !departures.is_empty() {
            sort_departures(&mut departures, (self.clock)());
        }
        Ok(departures)
    }

    /// Wait out the retry delay, or stop early on shutdown.
    async fn pause(&self) -> Result<(), ScheduleError> {
        let sleep = tokio::time::sleep(self.config.delay);
        let Some(mut shutdown) = self.shutdown.clone() else {
            sleep.await;
            return Ok(());
        };
        tokio::pin!(sleep);

        let cancelled = tokio::select! {
            () = &mut sleep => false,
            stopped = shutdown.wait_for(|stop| *stop) => stopped.is_ok(),
        };
        if cancelled {
            return Err(ScheduleError::Cancelled);
        }
        // The sender went away without signalling: keep waiting.
        if !sleep.is_elapsed() {
            sleep.await;
        }
        Ok(())
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
