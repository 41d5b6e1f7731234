//! Registry error types.

use std::path::PathBuf;

/// A lookup against the registry found nothing.
///
/// These are caller mistakes: they are reported immediately and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The station code is not in the station table.
    #[error("station code '{code}' is not supported")]
    UnknownStation { code: String },

    /// The traffic-type key is not in the traffic table.
    #[error("traffic type '{key}' is not valid")]
    UnknownTrafficType { key: String },
}

/// Errors raised while building a registry from a table.
#[derive(Debug, thiserror::Error)]
pub enum RegistryLoadError {
    /// Reading the table file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table file is not valid JSON or has the wrong shape.
    #[error("invalid registry JSON: {message}")]
    Json { message: String },

    /// Two stations share a code.
    #[error("duplicate station code '{code}'")]
    DuplicateStation { code: String },

    /// Two traffic types share a key.
    #[error("duplicate traffic type key '{key}'")]
    DuplicateTrafficType { key: String },

    /// A required field was empty.
    #[error("{field} must not be empty (entry '{entry}')")]
    EmptyField { field: &'static str, entry: String },
}
