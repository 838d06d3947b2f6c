//! Wire types for the Geocoding and Routes APIs.

use serde::{Deserialize, Serialize};

/// Place name used when reverse geocoding finds no locality.
pub const UNKNOWN_PLACE: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// `lat,lng` as the geocoder's `latlng` parameter expects.
    #[must_use]
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

// ---------------------------------------------------------------------------
// Geocoding
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResult {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: GeocodeLocation,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeLocation {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub(crate) fn is_locality(&self) -> bool {
        self.types
            .iter()
            .any(|t| t == "locality" || t == "postal_town")
    }
}

// ---------------------------------------------------------------------------
// Routes distance matrix
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RouteMatrixRequest {
    pub origins: Vec<RouteMatrixWaypoint>,
    pub destinations: Vec<RouteMatrixWaypoint>,
    pub travel_mode: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RouteMatrixWaypoint {
    pub waypoint: Waypoint,
}

#[derive(Debug, Serialize)]
pub(crate) struct Waypoint {
    pub location: WaypointLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WaypointLocation {
    pub lat_lng: Coordinate,
}

impl RouteMatrixRequest {
    /// A one-origin, one-destination driving query.
    pub(crate) fn single_pair(from: Coordinate, to: Coordinate) -> Self {
        let point = |c: Coordinate| RouteMatrixWaypoint {
            waypoint: Waypoint {
                location: WaypointLocation { lat_lng: c },
            },
        };
        Self {
            origins: vec![point(from)],
            destinations: vec![point(to)],
            travel_mode: "DRIVE",
        }
    }
}

/// Pulls `distanceMeters` from the first matrix element, if present.
pub(crate) fn first_distance_meters(payload: &serde_json::Value) -> Option<f64> {
    payload
        .as_array()
        .and_then(|elements| elements.first())
        .and_then(|element| element.get("distanceMeters"))
        .and_then(serde_json::Value::as_f64)
}
