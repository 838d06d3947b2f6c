//! Spreadsheet row computation for the export reconciler.
//!
//! The row layout is fixed width: six stop columns regardless of how many
//! stops a delivery has. Deliveries with more than six stops surface only the
//! first six here; distance and earnings still reflect every stop.

use serde::Serialize;
use serde_json::{json, Value};

use crate::delivery::{split_segment_distances, DeliveryRecord};
use crate::rounding::{round2, round3};

/// Assumed vehicle fuel economy used to estimate trip fuel cost.
pub const KM_PER_LITER: f64 = 15.0;

pub const EXPORT_STOP_SLOTS: usize = 6;

pub const EXPORT_HEADERS: [&str; 17] = [
    "ID",
    "Timestamp",
    "Origin",
    "Destination",
    "Address A",
    "Address B",
    "Address C",
    "Address D",
    "Address E",
    "Address F",
    "Distance (km)",
    "Segment Distances",
    "Earnings (£)",
    "Net Earnings (£)",
    "Fuel Cost (£)",
    "Fuel Litres",
    "Price Per Litre (£)",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub id: i64,
    pub timestamp: String,
    pub origin: String,
    pub destination: String,
    pub stops: [String; EXPORT_STOP_SLOTS],
    pub distance_km: f64,
    pub segment_distances: String,
    pub earnings: f64,
    pub net_earnings: f64,
    pub fuel_cost: f64,
    pub fuel_in_liters: f64,
    pub price_per_liter: f64,
}

impl ExportRow {
    /// Cells in sheet column order, matching [`EXPORT_HEADERS`].
    #[must_use]
    pub fn cells(&self) -> Vec<Value> {
        let mut cells = Vec::with_capacity(EXPORT_HEADERS.len());
        cells.push(json!(self.id));
        cells.push(json!(self.timestamp));
        cells.push(json!(self.origin));
        cells.push(json!(self.destination));
        cells.extend(self.stops.iter().map(|s| json!(s)));
        cells.push(json!(self.distance_km));
        cells.push(json!(self.segment_distances));
        cells.push(json!(self.earnings));
        cells.push(json!(self.net_earnings));
        cells.push(json!(self.fuel_cost));
        cells.push(json!(self.fuel_in_liters));
        cells.push(json!(self.price_per_liter));
        cells
    }
}

/// Mean price-per-liter over records with a positive price; `0.0` when none has one.
#[must_use]
pub fn average_price_per_liter(records: &[DeliveryRecord]) -> f64 {
    let known: Vec<f64> = records
        .iter()
        .map(|r| r.price_per_liter)
        .filter(|p| *p > 0.0)
        .collect();
    if known.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = known.len() as f64;
    known.iter().sum::<f64>() / count
}

/// Sum of stored segment distances, falling back to the stored total (or 0).
#[must_use]
pub fn recomputed_distance(record: &DeliveryRecord) -> f64 {
    match split_segment_distances(record.segment_distances.as_deref()) {
        Some(segments) if !segments.is_empty() => segments.iter().sum(),
        _ => record.distance.unwrap_or(0.0),
    }
}

/// Gross earnings minus estimated fuel spend for `distance_km`.
#[must_use]
pub fn net_earnings(earnings: f64, distance_km: f64, price_per_liter: f64) -> f64 {
    earnings - distance_km * (price_per_liter / KM_PER_LITER)
}

/// First six stops, padded with empty strings.
#[must_use]
pub fn stop_slots(stops: &[String]) -> [String; EXPORT_STOP_SLOTS] {
    std::array::from_fn(|i| stops.get(i).cloned().unwrap_or_default())
}

/// Builds one row, substituting `average_price` when the record has no usable price.
#[must_use]
pub fn build_export_row(record: &DeliveryRecord, average_price: f64) -> ExportRow {
    let distance = recomputed_distance(record);
    let price = if record.price_per_liter > 0.0 {
        record.price_per_liter
    } else {
        average_price
    };
    let earnings = record.earnings.unwrap_or(0.0);

    ExportRow {
        id: record.id,
        timestamp: record.created_at.format(TIMESTAMP_FORMAT).to_string(),
        origin: record.origin.clone(),
        destination: record.destination.clone(),
        stops: stop_slots(&record.stops),
        distance_km: round2(distance),
        segment_distances: record.segment_distances.clone().unwrap_or_default(),
        earnings: round2(earnings),
        net_earnings: round2(net_earnings(earnings, distance, price)),
        fuel_cost: round2(record.fuel_cost),
        fuel_in_liters: round2(record.fuel_in_liters),
        price_per_liter: round3(price),
    }
}

/// Builds rows for a batch in the given order, sharing one average price.
#[must_use]
pub fn build_export_rows(records: &[DeliveryRecord]) -> Vec<ExportRow> {
    let average = average_price_per_liter(records);
    records
        .iter()
        .map(|record| build_export_row(record, average))
        .collect()
}
