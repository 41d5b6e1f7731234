//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::adif::DepartureRecord;
use crate::registry::{StationEntry, TrafficType};

/// Form body of `POST /get_train_data`.
///
/// Both fields are optional here so that a missing one gets our own error
/// message rather than the extractor's.
#[derive(Debug, Deserialize)]
pub struct TrainDataRequest {
    /// Station code, e.g. "13106"
    pub station_code: Option<String>,

    /// Traffic-type key, e.g. "2"
    pub traffic_type: Option<String>,
}

/// Departures for the front-end.
#[derive(Debug, Serialize)]
pub struct TrainDataResponse {
    /// Explanation when the board is empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Departures, soonest first
    pub horarios: Vec<DepartureRecord>,
}

/// A station in the station list.
#[derive(Debug, Serialize)]
pub struct StationSummary {
    pub code: String,
    pub name: String,
}

impl From<&StationEntry> for StationSummary {
    fn from(station: &StationEntry) -> Self {
        Self {
            code: station.code.clone(),
            name: station.display_name().to_string(),
        }
    }
}

/// Response for the station list.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationSummary>,
}

/// A traffic type in the traffic-type list.
#[derive(Debug, Serialize)]
pub struct TrafficTypeSummary {
    pub key: String,
    pub name: String,
}

impl From<&TrafficType> for TrafficTypeSummary {
    fn from(traffic: &TrafficType) -> Self {
        Self {
            key: traffic.key.clone(),
            name: traffic.name.clone(),
        }
    }
}

/// Response for the traffic-type list.
#[derive(Debug, Serialize)]
pub struct TrafficTypesResponse {
    pub traffic_types: Vec<TrafficTypeSummary>,
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
