//! HTTP route handlers.

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::registry::RegistryError;
use crate::schedule::{FetchOutcome, ScheduleError};

use super::dto::*;
use super::state::AppState;
use super::templates::IndexTemplate;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/stations", get(list_stations))
        .route("/api/traffic-types", get(list_traffic_types))
        .route("/get_train_data", post(get_train_data))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Landing page.
async fn index_page(State(state): State<AppState>) -> impl IntoResponse {
    Html(
        IndexTemplate::from_registry(state.registry())
            .render()
            .unwrap_or_else(|e| format!("Template error: {e}")),
    )
}

async fn list_stations(State(state): State<AppState>) -> Json<StationsResponse> {
    Json(StationsResponse {
        stations: state.registry().stations().map(StationSummary::from).collect(),
    })
}

async fn list_traffic_types(State(state): State<AppState>) -> Json<TrafficTypesResponse> {
    Json(TrafficTypesResponse {
        traffic_types: state
            .registry()
            .traffic_types()
            .map(TrafficTypeSummary::from)
            .collect(),
    })
}

/// Fetch the departure board for a station.
async fn get_train_data(
    State(state): State<AppState>,
    form: Result<Form<TrainDataRequest>, FormRejection>,
) -> Result<Json<TrainDataResponse>, AppError> {
    let Form(req) = form.map_err(|e| AppError::BadRequest {
        message: format!("Invalid form data: {e}"),
    })?;

    let (Some(station_code), Some(traffic_key)) = (
        non_blank(req.station_code.as_deref()),
        non_blank(req.traffic_type.as_deref()),
    ) else {
        return Err(AppError::BadRequest {
            message: "Missing parameters: 'station_code' or 'traffic_type'.".to_string(),
        });
    };

    let registry = state.registry();
    let station = registry.resolve_station(station_code)?;
    let traffic = registry.resolve_traffic(traffic_key)?;

    info!(
        station = %station.code,
        name = station.display_name(),
        traffic = %traffic.name,
        "departures requested"
    );

    match state.fetcher.fetch_schedule(station, &traffic.value).await {
        FetchOutcome::Success(horarios) => {
            info!(station = %station.code, count = horarios.len(), "returning departures");
            Ok(Json(TrainDataResponse {
                message: None,
                horarios,
            }))
        }
        FetchOutcome::EmptySuccess => Ok(Json(TrainDataResponse {
            message: Some(format!(
                "No departures found for {} and traffic type '{}'. \
                 There may be no trains scheduled right now for these criteria.",
                station.display_name(),
                traffic.name
            )),
            horarios: Vec::new(),
        })),
        FetchOutcome::Failure(e) => Err(e.into()),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
    BadGateway { message: String },
    Unavailable { message: String },
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        match e {
            ScheduleError::Validation(e) => e.into(),
            ScheduleError::ExhaustedRetries {
                attempts,
                last_error,
            } => AppError::Internal {
                message: format!(
                    "Could not get departures from Adif after {attempts} attempts, \
                     try again later (last error: {last_error})"
                ),
            },
            ScheduleError::Misconfigured { reason } => AppError::Internal {
                message: format!("Server cannot reach Adif: {reason}"),
            },
            ScheduleError::MalformedResponse { reason } => AppError::BadGateway {
                message: format!("Adif returned an unexpected response: {reason}"),
            },
            ScheduleError::Cancelled => AppError::Unavailable {
                message: "Server is shutting down".to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
