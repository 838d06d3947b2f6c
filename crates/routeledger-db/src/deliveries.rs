//! Database operations for the `deliveries` table.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use routeledger_core::rounding::round2;
use routeledger_core::{
    join_segment_distances, join_stops, split_stops, DeliveryRecord, NewDelivery,
};

use crate::DbError;

const DELIVERY_COLUMNS: &str = "id, created_at, origin, destination, distance, segment_distances, \
     stops, earnings, fuel_cost, fuel_in_liters, price_per_liter, exported";

/// A row from the `deliveries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeliveryRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub origin: String,
    pub destination: String,
    pub distance: Option<f64>,
    /// Comma-joined kilometer values, one per route segment.
    pub segment_distances: Option<String>,
    /// Pipe-joined stop addresses in route order.
    pub stops: Option<String>,
    pub earnings: Option<f64>,
    pub fuel_cost: f64,
    pub fuel_in_liters: f64,
    pub price_per_liter: f64,
    pub exported: bool,
}

impl From<DeliveryRow> for DeliveryRecord {
    fn from(row: DeliveryRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            stops: split_stops(row.stops.as_deref()),
            origin: row.origin,
            destination: row.destination,
            distance: row.distance,
            segment_distances: row.segment_distances,
            earnings: row.earnings,
            fuel_cost: row.fuel_cost,
            fuel_in_liters: row.fuel_in_liters,
            price_per_liter: row.price_per_liter,
            exported: row.exported,
        }
    }
}

/// Aggregates across every stored delivery, each rounded to 2dp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryTotals {
    pub distance: f64,
    pub earnings: f64,
    pub fuel_cost: f64,
    pub liters_purchased: f64,
    /// Mean of the non-zero prices; zero-priced rows are unknown, not free.
    pub avg_price_per_liter: f64,
}

#[derive(sqlx::FromRow)]
struct TotalsRow {
    distance: Option<f64>,
    earnings: Option<f64>,
    fuel_cost: Option<f64>,
    liters_purchased: Option<f64>,
    avg_price_per_liter: Option<f64>,
}

/// Inserts a new delivery with `exported = false` and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_delivery(pool: &PgPool, delivery: &NewDelivery) -> Result<DeliveryRow, DbError> {
    let row = sqlx::query_as::<_, DeliveryRow>(&format!(
        "INSERT INTO deliveries \
             (origin, destination, distance, earnings, fuel_cost, fuel_in_liters, \
              price_per_liter, segment_distances, stops) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING {DELIVERY_COLUMNS}"
    ))
    .bind(&delivery.origin)
    .bind(&delivery.destination)
    .bind(delivery.distance)
    .bind(delivery.earnings)
    .bind(delivery.fuel_cost)
    .bind(delivery.fuel_in_liters)
    .bind(delivery.price_per_liter)
    .bind(join_segment_distances(&delivery.segment_distances))
    .bind(join_stops(&delivery.stops))
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns every delivery in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_deliveries(pool: &PgPool) -> Result<Vec<DeliveryRow>, DbError> {
    let rows = sqlx::query_as::<_, DeliveryRow>(&format!(
        "SELECT {DELIVERY_COLUMNS} FROM deliveries ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns deliveries not yet exported, in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unexported_deliveries(pool: &PgPool) -> Result<Vec<DeliveryRow>, DbError> {
    let rows = sqlx::query_as::<_, DeliveryRow>(&format!(
        "SELECT {DELIVERY_COLUMNS} FROM deliveries WHERE exported = FALSE ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Flags one delivery as exported.
///
/// Returns `false` when no row with `id` exists (e.g. it was deleted while an
/// export was in flight). Flagging an already-exported row is a no-op that
/// still returns `true`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn mark_delivery_exported(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("UPDATE deliveries SET exported = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes one delivery by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the delete fails.
pub async fn delete_delivery(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM deliveries WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Deletes every delivery and returns how many rows were removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn clear_deliveries(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM deliveries").execute(pool).await?;
    Ok(result.rows_affected())
}

/// Sums distance, earnings, fuel cost and liters, and averages non-zero prices.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delivery_totals(pool: &PgPool) -> Result<DeliveryTotals, DbError> {
    let row = sqlx::query_as::<_, TotalsRow>(
        "SELECT SUM(distance)                    AS distance, \
                SUM(earnings)                    AS earnings, \
                SUM(fuel_cost)                   AS fuel_cost, \
                SUM(fuel_in_liters)              AS liters_purchased, \
                AVG(NULLIF(price_per_liter, 0))  AS avg_price_per_liter \
         FROM deliveries",
    )
    .fetch_one(pool)
    .await?;

    Ok(DeliveryTotals {
        distance: round2(row.distance.unwrap_or(0.0)),
        earnings: round2(row.earnings.unwrap_or(0.0)),
        fuel_cost: round2(row.fuel_cost.unwrap_or(0.0)),
        liters_purchased: round2(row.liters_purchased.unwrap_or(0.0)),
        avg_price_per_liter: round2(row.avg_price_per_liter.unwrap_or(0.0)),
    })
}
