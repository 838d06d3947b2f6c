//! Turns a delivery submission into a persisted record.
//!
//! Validation runs before any provider call. The route distance and the stop
//! earnings are both computed before the single insert, so a failure at any
//! step leaves the store untouched.

use sqlx::PgPool;

use routeledger_core::{DeliveryRequest, DeliverySubmission, EarningTiers, NewDelivery};
use routeledger_db::{insert_delivery, DeliveryRow};
use routeledger_maps::{compute_route, MapsClient};

use crate::error::LedgerError;

/// Sums the tier rate of every stop's resolved place name. The sum is left
/// unrounded; export and totals round for display.
///
/// Origin and destination never earn. Each stop is geocoded, reverse-geocoded
/// to a place name and classified against `tiers`; an empty stop list earns
/// nothing and makes no provider calls.
///
/// # Errors
///
/// - [`LedgerError::UnresolvedStop`] for the first stop the geocoder cannot match.
/// - [`LedgerError::StopEarnings`] for transport or provider failures.
pub async fn earnings_for_stops(
    maps: &MapsClient,
    tiers: &EarningTiers,
    stops: &[String],
) -> Result<f64, LedgerError> {
    let mut total = 0.0;
    for stop in stops {
        let coordinate = maps
            .resolve_coordinates(stop)
            .await
            .map_err(LedgerError::StopEarnings)?
            .ok_or_else(|| LedgerError::UnresolvedStop {
                address: stop.clone(),
            })?;
        let place = maps
            .resolve_place_name(coordinate)
            .await
            .map_err(LedgerError::StopEarnings)?;
        let rate = tiers.classify(&place);
        tracing::debug!(stop = %stop, place = %place, rate, "stop classified");
        total += rate;
    }
    Ok(total)
}

/// Computes route distance and earnings for a validated request.
///
/// # Errors
///
/// Returns [`LedgerError::Route`] if the route cannot be computed, or any
/// error from [`earnings_for_stops`].
pub async fn build_delivery(
    maps: &MapsClient,
    tiers: &EarningTiers,
    request: &DeliveryRequest,
) -> Result<NewDelivery, LedgerError> {
    let route = compute_route(maps, &request.waypoints())
        .await
        .map_err(LedgerError::Route)?;
    let earnings = earnings_for_stops(maps, tiers, &request.stops).await?;

    Ok(NewDelivery {
        origin: request.origin.clone(),
        destination: request.destination.clone(),
        stops: request.stops.clone(),
        segment_distances: route.segment_distances(),
        distance: route.total_distance_km,
        earnings,
        fuel_cost: request.fuel_cost,
        fuel_in_liters: request.fuel_in_liters,
        price_per_liter: request.price_per_liter,
    })
}

/// Validates, prices and stores one delivery.
///
/// # Errors
///
/// - [`LedgerError::Validation`] before any provider call.
/// - Any error from [`build_delivery`]; nothing is stored in that case.
/// - [`LedgerError::Persistence`] if the insert fails.
pub async fn submit_delivery(
    pool: &PgPool,
    maps: &MapsClient,
    tiers: &EarningTiers,
    submission: DeliverySubmission,
) -> Result<DeliveryRow, LedgerError> {
    let request = submission.validate()?;
    let delivery = build_delivery(maps, tiers, &request).await?;
    let row = insert_delivery(pool, &delivery).await?;

    tracing::info!(
        id = row.id,
        stops = delivery.stops.len(),
        distance_km = delivery.distance,
        earnings = delivery.earnings,
        "delivery recorded"
    );
    Ok(row)
}
