//! Server configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::adif::AdifConfig;
use crate::schedule::{EmptyPolicy, FetchConfig};

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {variable}")]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: SocketAddr,
    /// Upstream portal settings
    pub adif: AdifConfig,
    /// Retry policy
    pub fetch: FetchConfig,
    /// Optional replacement for the built-in station table
    pub stations_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host: IpAddr = parse_or(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port: u16 = parse_or(&lookup, "PORT", 5000)?;

        let mut adif = AdifConfig::new();
        if let Some(url) = lookup("ADIF_BASE_URL") {
            adif = adif.with_base_url(url);
        }
        if let Some(origin) = lookup("ADIF_ORIGIN") {
            adif = adif.with_origin(origin);
        }
        if let Some(network) = lookup("ADIF_COMMUTER_NETWORK") {
            adif = adif.with_commuter_network(network);
        }
        let timeout_secs: u64 = parse_or(&lookup, "FETCH_TIMEOUT_SECS", adif.timeout.as_secs())?;
        adif = adif.with_timeout(Duration::from_secs(timeout_secs));

        let defaults = FetchConfig::default();
        let max_retries = parse_or(&lookup, "FETCH_MAX_RETRIES", defaults.max_retries)?;
        let delay_secs = parse_or(&lookup, "FETCH_DELAY_SECS", defaults.delay.as_secs())?;
        let accept_empty = parse_or(&lookup, "FETCH_ACCEPT_EMPTY", false)?;
        let empty_policy = if accept_empty {
            EmptyPolicy::Accept
        } else {
            EmptyPolicy::Retry
        };
        let fetch = FetchConfig::new(max_retries, Duration::from_secs(delay_secs))
            .with_empty_policy(empty_policy);

        Ok(Self {
            bind: SocketAddr::new(host, port),
            adif,
            fetch,
            stations_file: lookup("STATIONS_FILE").map(PathBuf::from),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    variable: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(variable) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError { variable, value }),
    }
}
