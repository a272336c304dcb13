//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::Station;
use crate::planner::{Itinerary, Step};

/// Query for a route search.
///
/// The Spanish parameter names used by the existing web client are
/// accepted as aliases.
#[derive(Debug, Deserialize)]
pub struct FindPathQuery {
    /// Origin station identifier
    #[serde(alias = "estacion_origen")]
    pub origin: String,

    /// Destination station identifier
    #[serde(alias = "estacion_destino")]
    pub destination: String,

    /// Trip date and time (ISO 8601; defaults to now)
    #[serde(default, alias = "dia_viaje")]
    pub departure: Option<String>,

    /// Whether it is raining (slower trains)
    #[serde(default, alias = "lluvia")]
    pub rain: bool,
}

/// Response envelope: `code` 0 with `data` on success, 1 with `error`
/// otherwise.
#[derive(Debug, Serialize)]
pub struct ServerResponse<T> {
    pub code: u8,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ServerResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            code: 1,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// A found route.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    /// Station identifiers in travel order
    pub stations: Vec<String>,

    pub steps: Vec<StepResult>,

    /// Total time in minutes
    pub total_minutes: f64,

    /// Total time in seconds
    pub total_secs: f64,

    /// Total track distance in km
    pub total_distance_km: f64,

    /// Line codes in order of first use
    pub lines_used: Vec<String>,

    /// Number of line changes
    pub transfers: usize,
}

/// One ride between adjacent stations.
#[derive(Debug, Serialize)]
pub struct StepResult {
    pub from: String,
    pub from_name: Option<String>,
    pub to: String,
    pub to_name: Option<String>,
    pub line: String,
    pub distance_km: f64,
    /// Step time in minutes, including any line-change walk
    pub minutes: f64,
    pub is_transfer: bool,
}

/// Station summary for map rendering.
#[derive(Debug, Serialize)]
pub struct StationSummary {
    pub id: String,
    pub name: Option<String>,
    pub lines: Vec<String>,
    pub anchors: Vec<AnchorResult>,
    pub open: bool,
}

/// Platform location of a station on one line.
#[derive(Debug, Serialize)]
pub struct AnchorResult {
    pub line: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl ServerResponse<ItineraryResult> {
    /// Wrap a search outcome, successful or not.
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        if itinerary.success {
            Self::ok(ItineraryResult::from_itinerary(itinerary))
        } else {
            Self::failed(itinerary.message.clone())
        }
    }
}

impl ItineraryResult {
    /// Create from a planner Itinerary.
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        Self {
            stations: itinerary
                .stations
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            steps: itinerary.steps.iter().map(StepResult::from_step).collect(),
            total_minutes: itinerary.total_minutes(),
            total_secs: itinerary.total_secs,
            total_distance_km: itinerary.total_distance_km,
            lines_used: itinerary
                .lines_used
                .iter()
                .map(|l| l.as_str().to_string())
                .collect(),
            transfers: itinerary.transfers,
        }
    }
}

impl StepResult {
    pub fn from_step(step: &Step) -> Self {
        Self {
            from: step.from.as_str().to_string(),
            from_name: step.from_name.clone(),
            to: step.to.as_str().to_string(),
            to_name: step.to_name.clone(),
            line: step.line.as_str().to_string(),
            distance_km: step.distance_km,
            minutes: step.cost_secs / 60.0,
            is_transfer: step.is_transfer,
        }
    }
}

impl StationSummary {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id().as_str().to_string(),
            name: station.display_name().map(str::to_string),
            lines: station
                .lines()
                .iter()
                .map(|l| l.as_str().to_string())
                .collect(),
            anchors: station
                .anchors()
                .iter()
                .map(|a| AnchorResult {
                    line: a.line.as_str().to_string(),
                    latitude: a.coordinates.latitude(),
                    longitude: a.coordinates.longitude(),
                })
                .collect(),
            open: station.is_open(),
        }
    }
}
