//! Delivery submissions and the persisted delivery record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Separates stop addresses in the stored `stops` column.
pub const STOP_DELIMITER: char = '|';

/// Separates per-segment kilometer values in the stored `segment_distances` column.
pub const SEGMENT_DELIMITER: char = ',';

/// A delivery as submitted by a caller, before validation.
///
/// Every field is optional here so that a missing field is reported as a
/// validation error naming it rather than as a generic decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliverySubmission {
    pub origin: Option<String>,
    pub destination: Option<String>,
    #[serde(default)]
    pub stops: Option<Vec<String>>,
    pub fuel_cost: Option<f64>,
    pub fuel_in_liters: Option<f64>,
    pub price_per_liter: Option<f64>,
}

/// A validated delivery ready for route computation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryRequest {
    pub origin: String,
    pub destination: String,
    pub stops: Vec<String>,
    pub fuel_cost: f64,
    pub fuel_in_liters: f64,
    pub price_per_liter: f64,
}

impl DeliverySubmission {
    /// Checks required fields in a fixed order and reports the first missing one.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingField`] for an absent or blank required field,
    /// or [`CoreError::InvalidField`] for a non-finite number or a stop that
    /// contains [`STOP_DELIMITER`].
    pub fn validate(self) -> Result<DeliveryRequest, CoreError> {
        let origin = required_text("origin", self.origin)?;
        let destination = required_text("destination", self.destination)?;
        let fuel_cost = required_number("fuel_cost", self.fuel_cost)?;
        let fuel_in_liters = required_number("fuel_in_liters", self.fuel_in_liters)?;
        let price_per_liter = required_number("price_per_liter", self.price_per_liter)?;

        let stops = self.stops.unwrap_or_default();
        if let Some(bad) = stops.iter().find(|s| s.contains(STOP_DELIMITER)) {
            return Err(CoreError::InvalidField {
                field: "stops",
                reason: format!("stop address must not contain '{STOP_DELIMITER}': {bad}"),
            });
        }

        Ok(DeliveryRequest {
            origin,
            destination,
            stops,
            fuel_cost,
            fuel_in_liters,
            price_per_liter,
        })
    }
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, CoreError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(CoreError::MissingField(field))
}

fn required_number(field: &'static str, value: Option<f64>) -> Result<f64, CoreError> {
    let value = value.ok_or(CoreError::MissingField(field))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::InvalidField {
            field,
            reason: format!("expected a finite number, got {value}"),
        })
    }
}

impl DeliveryRequest {
    /// The full ordered route: origin, every stop in submitted order, destination.
    #[must_use]
    pub fn waypoints(&self) -> Vec<String> {
        let mut route = Vec::with_capacity(self.stops.len() + 2);
        route.push(self.origin.clone());
        route.extend(self.stops.iter().cloned());
        route.push(self.destination.clone());
        route
    }
}

/// Derived fields for a delivery that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDelivery {
    pub origin: String,
    pub destination: String,
    pub stops: Vec<String>,
    pub segment_distances: Vec<f64>,
    pub distance: f64,
    pub earnings: f64,
    pub fuel_cost: f64,
    pub fuel_in_liters: f64,
    pub price_per_liter: f64,
}

/// A persisted delivery as read back from the store.
///
/// `distance`, `segment_distances` and `earnings` are optional because rows
/// written by older versions may lack them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub origin: String,
    pub destination: String,
    pub stops: Vec<String>,
    pub distance: Option<f64>,
    pub segment_distances: Option<String>,
    pub earnings: Option<f64>,
    pub fuel_cost: f64,
    pub fuel_in_liters: f64,
    pub price_per_liter: f64,
    pub exported: bool,
}

#[must_use]
pub fn join_stops(stops: &[String]) -> String {
    stops.join(&STOP_DELIMITER.to_string())
}

/// Inverse of [`join_stops`]; an absent or empty column yields no stops.
#[must_use]
pub fn split_stops(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.is_empty() => s.split(STOP_DELIMITER).map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

/// Renders kilometer values as `12.3,5.0,0.75`.
#[must_use]
pub fn join_segment_distances(segments: &[f64]) -> String {
    segments
        .iter()
        .map(|km| format!("{km:?}"))
        .collect::<Vec<_>>()
        .join(&SEGMENT_DELIMITER.to_string())
}

/// Parses a stored segment list. Returns `None` for an absent or empty column
/// or when any entry is not a number.
#[must_use]
pub fn split_segment_distances(raw: Option<&str>) -> Option<Vec<f64>> {
    let raw = raw.filter(|s| !s.trim().is_empty())?;
    raw.split(SEGMENT_DELIMITER)
        .map(|s| s.trim().parse::<f64>().ok())
        .collect()
}
