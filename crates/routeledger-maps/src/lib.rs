//! Google Maps Platform client: geocoding and pairwise route distances.

pub mod client;
pub mod error;
pub mod route;
pub mod types;

pub use client::MapsClient;
pub use error::MapsError;
pub use route::{compute_route, RouteSegment, RouteSummary};
pub use types::{Coordinate, UNKNOWN_PLACE};
