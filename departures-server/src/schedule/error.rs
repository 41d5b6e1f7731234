//! Schedule fetch error types.

use crate::registry::RegistryError;

/// Why no departure list could be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Unknown station or traffic type. Never retried.
    #[error(transparent)]
    Validation(#[from] RegistryError),

    /// The portal answered, but not in a shape we understand. Never retried:
    /// a format change won't fix itself within the retry window.
    #[error("unexpected response from the portal: {reason}")]
    MalformedResponse { reason: String },

    /// Our own portal settings are unusable. Never retried.
    #[error("portal client is misconfigured: {reason}")]
    Misconfigured { reason: String },

    /// Every attempt failed transiently.
    #[error("no departures after {attempts} attempts (last error: {last_error})")]
    ExhaustedRetries { attempts: u32, last_error: String },

    /// Shutdown was requested while waiting to retry.
    #[error("fetch cancelled by shutdown")]
    Cancelled,
}
