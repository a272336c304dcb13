//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Local, NaiveDateTime};
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, error, warn};

use crate::domain::StationId;
use crate::planner::{Planner, SearchRequest};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/v1/find-path", get(find_path))
        .route("/api/v1/stations", get(list_stations))
        .with_state(state)
}

/// CORS layer allowing browser clients from `origins` to call the API.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET])
        .allow_headers(Any)
}

/// Liveness message.
async fn index() -> Json<Value> {
    Json(json!({ "message": "API Server is running" }))
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Find the fastest route between two stations.
async fn find_path(
    State(state): State<AppState>,
    Query(query): Query<FindPathQuery>,
) -> Result<Json<ServerResponse<ItineraryResult>>, AppError> {
    let origin = parse_station(&query.origin, "origin")?;
    let destination = parse_station(&query.destination, "destination")?;

    let departure = match query.departure.as_deref() {
        Some(raw) => parse_departure(raw)?,
        None => Local::now().naive_local(),
    };

    let request = SearchRequest::new(
        origin,
        destination,
        departure,
        state.network.max_crowd_load(),
        state.config.travel_speed_kmh(query.rain),
    );
    debug!(
        origin = %request.origin,
        destination = %request.destination,
        %departure,
        rain = query.rain,
        "route search"
    );

    // Pure CPU work; keep it off the async workers.
    let itinerary = tokio::task::spawn_blocking(move || {
        Planner::new(&state.network, &state.config).route(&request)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("route search failed: {e}"),
    })?;

    if !itinerary.success {
        debug!(message = %itinerary.message, "no route");
    }

    Ok(Json(ServerResponse::from_itinerary(&itinerary)))
}

/// All stations, ordered by identifier.
async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationSummary>> {
    let mut stations: Vec<_> = state.network.stations().iter().collect();
    stations.sort_by(|a, b| a.id().cmp(b.id()));

    Json(
        stations
            .into_iter()
            .map(StationSummary::from_station)
            .collect(),
    )
}

fn parse_station(raw: &str, role: &str) -> Result<StationId, AppError> {
    StationId::new(raw.trim()).map_err(|e| AppError::BadRequest {
        message: format!("Invalid {role} station: {e}"),
    })
}

/// Parse a trip time: ISO 8601 local time with or without seconds, or an
/// RFC 3339 timestamp whose offset is dropped.
fn parse_departure(raw: &str) -> Result<NaiveDateTime, AppError> {
    let raw = raw.trim();
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .ok_or_else(|| AppError::BadRequest {
            message: format!("Invalid departure time: {raw}"),
        })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(%message, "bad request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Internal { message } => {
                error!(%message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
