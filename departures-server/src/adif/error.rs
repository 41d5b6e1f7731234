//! Adif client error types.

use std::error::Error as _;

/// Errors from talking to the Adif portal.
#[derive(Debug, thiserror::Error)]
pub enum AdifError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {}", describe(.0))]
    Http(#[from] reqwest::Error),

    /// The station page URL could not be built.
    #[error("invalid portal URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The portal answered with something other than 200 OK.
    #[error("portal returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The station page did not contain a `p_p_auth` token.
    #[error("no p_p_auth token found on {url}")]
    MissingToken { url: String },

    /// The schedule payload is not the JSON shape we expect.
    #[error("malformed schedule payload: {message} (body: {body})")]
    Json { message: String, body: String },
}

impl AdifError {
    /// Whether the error means the portal changed its payload format.
    pub fn is_malformed(&self) -> bool {
        matches!(self, AdifError::Json { .. })
    }

    /// Whether the error comes from our own settings rather than the portal.
    /// Retrying can't help.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(self, AdifError::InvalidUrl { .. })
    }
}

/// reqwest's message plus its chain of causes, which is where "timed out"
/// or "connection refused" actually lives.
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    if error.is_timeout() && !message.contains("timed out") {
        message.push_str(" (timed out)");
    }
    message
}

/// First 500 characters of a response body, for diagnostics.
pub(crate) fn snippet(body: &str) -> String {
    body.chars().take(500).collect()
}
