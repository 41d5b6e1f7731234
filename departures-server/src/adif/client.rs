//! Adif portal HTTP client.
//!
//! Each [`AdifSession`] is a browser-like context for one station: its own
//! cookie jar and connection pool, dropped with the session.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT};

use crate::registry::StationEntry;
use crate::schedule::{Portal, PortalSession};

use super::error::{AdifError, snippet};
use super::token::{AuthToken, extract_auth_token};

/// Default base URL for station pages.
const DEFAULT_BASE_URL: &str = "https://www.adif.es/w";

/// Default value for the `Origin` header of board queries.
const DEFAULT_ORIGIN: &str = "https://www.adif.es";

/// A desktop browser; the portal serves a different page to unknown agents.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:115.0) Gecko/20100101 Firefox/115.0";

/// Commuter network the board query is scoped to.
const DEFAULT_COMMUTER_NETWORK: &str = "BILBAO";

/// Content entry that hosts the station services portlet.
const DEFAULT_ASSET_ENTRY_ID: &str = "3127062";

const DEFAULT_TIMEOUT_SECS: u64 = 20;

const PORTLET_ID: &str = "servicios_estacion_ServiciosEstacionPortlet";

/// Configuration for the Adif client.
#[derive(Debug, Clone)]
pub struct AdifConfig {
    /// Base URL that station page paths are appended to
    pub base_url: String,
    /// `Origin` header sent with board queries
    pub origin: String,
    /// User agent for every request
    pub user_agent: String,
    /// Commuter network form field
    pub commuter_network: String,
    /// `assetEntryId` query parameter
    pub asset_entry_id: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl AdifConfig {
    /// Create a config pointing at the production portal.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            commuter_network: DEFAULT_COMMUTER_NETWORK.to_string(),
            asset_entry_id: DEFAULT_ASSET_ENTRY_ID.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the `Origin` header value.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the commuter network.
    pub fn with_commuter_network(mut self, network: impl Into<String>) -> Self {
        self.commuter_network = network.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of a station's page.
    fn station_url(&self, station: &StationEntry) -> Result<reqwest::Url, AdifError> {
        let raw = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            station.page_path()
        );
        reqwest::Url::parse(&raw).map_err(|e| AdifError::InvalidUrl {
            url: raw,
            message: e.to_string(),
        })
    }
}

impl Default for AdifConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Opens [`AdifSession`]s against the portal.
#[derive(Debug, Clone)]
pub struct AdifPortal {
    config: Arc<AdifConfig>,
}

impl AdifPortal {
    pub fn new(config: AdifConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Portal for AdifPortal {
    type Session = AdifSession;

    fn open_session(&self, station: &StationEntry) -> Result<AdifSession, AdifError> {
        let page_url = self.config.station_url(station)?;

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(self.config.timeout)
            .build()?;

        Ok(AdifSession {
            http,
            config: Arc::clone(&self.config),
            page_url,
            station_code: station.code.clone(),
        })
    }
}

/// One station's browsing session: cookies, token and board query.
#[derive(Debug)]
pub struct AdifSession {
    http: reqwest::Client,
    config: Arc<AdifConfig>,
    page_url: reqwest::Url,
    station_code: String,
}

impl AdifSession {
    /// The station page URL, also sent as `Referer` on board queries.
    fn page_url(&self) -> &str {
        self.page_url.as_str()
    }
}

impl PortalSession for AdifSession {
    async fn acquire_token(&mut self) -> Result<AuthToken, AdifError> {
        let response = self
            .http
            .get(self.page_url.clone())
            .header(USER_AGENT, self.config.user_agent.as_str())
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "es-ES,es;q=0.9,en-US;q=0.8,en;q=0.7")
            .header("Upgrade-Insecure-Requests", "1")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AdifError::Status {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        let body = response.text().await?;
        extract_auth_token(&body).ok_or_else(|| AdifError::MissingToken {
            url: self.page_url().to_string(),
        })
    }

    async fn query_departures(
        &mut self,
        token: &AuthToken,
        traffic_value: &str,
    ) -> Result<String, AdifError> {
        let url = board_query_url(self.page_url(), &self.config.asset_entry_id, token);
        let form = board_query_form(
            traffic_value,
            &self.config.commuter_network,
            &self.station_code,
        );

        let response = self
            .http
            .post(url)
            .header(USER_AGENT, self.config.user_agent.as_str())
            .header(REFERER, self.page_url())
            .header(ORIGIN, self.config.origin.as_str())
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AdifError::Status {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        Ok(response.text().await?)
    }
}

/// URL of the board query resource on a station page.
///
/// Written out by hand rather than through a query serializer so the
/// resource id keeps its literal slash, as the page's own script sends it.
fn board_query_url(page_url: &str, asset_entry_id: &str, token: &AuthToken) -> String {
    format!(
        "{page_url}?p_p_id={PORTLET_ID}\
         &p_p_lifecycle=2\
         &p_p_state=normal\
         &p_p_mode=view\
         &p_p_resource_id=/consultarHorario\
         &p_p_cacheability=cacheLevelPage\
         &assetEntryId={asset_entry_id}\
         &p_p_auth={token}"
    )
}

/// Form body of the board query.
fn board_query_form(
    traffic_value: &str,
    commuter_network: &str,
    station_code: &str,
) -> Vec<(String, String)> {
    [
        ("searchType", "proximasSalidas"),
        ("trafficType", traffic_value),
        ("numPage", "0"),
        ("commuterNetwork", commuter_network),
        ("stationCode", station_code),
    ]
    .into_iter()
    .map(|(field, value)| (format!("_{PORTLET_ID}_{field}"), value.to_string()))
    .collect()
}
