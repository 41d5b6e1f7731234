//! Schedule payload DTOs.
//!
//! Field names are the portal's own and are passed through unchanged to the
//! front-end, which reads them by these names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{AdifError, snippet};

/// Body of a `consultarHorario` response.
#[derive(Debug, Clone, Deserialize)]
struct ScheduleResponse {
    /// Upcoming departures, in the portal's order.
    horarios: Vec<DepartureRecord>,
}

/// One row of a departure board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartureRecord {
    /// Departure time as displayed: either "N min" or "HH:MM".
    pub hora: String,

    /// Destination station name.
    pub estacion: String,

    /// Track / platform.
    pub via: String,

    /// Train number.
    pub tren: String,

    /// Any other fields the portal sends, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DepartureRecord {
    pub fn new(
        hora: impl Into<String>,
        estacion: impl Into<String>,
        via: impl Into<String>,
        tren: impl Into<String>,
    ) -> Self {
        Self {
            hora: hora.into(),
            estacion: estacion.into(),
            via: via.into(),
            tren: tren.into(),
            extra: Map::new(),
        }
    }
}

/// Parse a `consultarHorario` response body.
///
/// A body that is not JSON, or JSON without a `horarios` list of records, is
/// reported as [`AdifError::Json`] with the start of the body attached.
pub fn parse_schedule(body: &str) -> Result<Vec<DepartureRecord>, AdifError> {
    let response: ScheduleResponse =
        serde_json::from_str(body).map_err(|e| AdifError::Json {
            message: e.to_string(),
            body: snippet(body),
        })?;
    Ok(response.horarios)
}
