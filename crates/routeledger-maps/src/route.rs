//! Multi-stop route distance computation.
//!
//! Every address is geocoded first, stopping at the first one that cannot be
//! resolved. Then each consecutive pair of waypoints is queried once, in route
//! order. Each segment is rounded to 2dp on its own and the total is the sum
//! of those rounded segments.

use serde::Serialize;

use routeledger_core::rounding::{meters_to_km, round2};

use crate::client::MapsClient;
use crate::error::MapsError;
use crate::types::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub from_index: usize,
    pub to_index: usize,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub segments: Vec<RouteSegment>,
    pub total_distance_km: f64,
}

impl RouteSummary {
    /// Per-segment kilometers in route order.
    #[must_use]
    pub fn segment_distances(&self) -> Vec<f64> {
        self.segments.iter().map(|s| s.distance_km).collect()
    }

    fn from_segments(segments: Vec<RouteSegment>) -> Self {
        // Re-rounding only strips float noise from adding 2dp values.
        let total_distance_km = round2(segments.iter().map(|s| s.distance_km).sum());
        Self {
            segments,
            total_distance_km,
        }
    }
}

/// Computes per-segment and total driving distance for an ordered route.
///
/// # Errors
///
/// - [`MapsError::TooFewWaypoints`] when fewer than two addresses are given.
/// - [`MapsError::UnresolvedLocation`] for the first address the geocoder
///   cannot match; no distance queries are issued in that case.
/// - [`MapsError::SegmentDistance`] for the first segment whose response has
///   no distance; later segments are not queried.
/// - Any transport or decoding error from the client.
pub async fn compute_route(
    client: &MapsClient,
    addresses: &[String],
) -> Result<RouteSummary, MapsError> {
    if addresses.len() < 2 {
        return Err(MapsError::TooFewWaypoints(addresses.len()));
    }

    let mut coordinates: Vec<Coordinate> = Vec::with_capacity(addresses.len());
    for address in addresses {
        let coordinate = client
            .resolve_coordinates(address)
            .await?
            .ok_or_else(|| MapsError::UnresolvedLocation {
                address: address.clone(),
            })?;
        coordinates.push(coordinate);
    }

    let mut segments = Vec::with_capacity(coordinates.len() - 1);
    for (i, pair) in coordinates.windows(2).enumerate() {
        let meters = client
            .segment_distance_meters(i, i + 1, pair[0], pair[1])
            .await?;
        segments.push(RouteSegment {
            from_index: i,
            to_index: i + 1,
            distance_km: meters_to_km(meters),
        });
    }

    let summary = RouteSummary::from_segments(segments);
    tracing::info!(
        waypoints = addresses.len(),
        total_km = summary.total_distance_km,
        "route distance computed"
    );
    Ok(summary)
}
