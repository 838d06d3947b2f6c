//! HTTP client for the Google Geocoding and Routes APIs.
//!
//! The API key is injected at construction through [`MapsConfig`]; base URLs
//! are configurable so tests can point the client at a mock server.

use std::time::Duration;

use reqwest::{Client, Url};
use routeledger_core::MapsConfig;

use crate::error::MapsError;
use crate::types::{
    first_distance_meters, Coordinate, GeocodeResponse, RouteMatrixRequest, UNKNOWN_PLACE,
};

const GEOCODE_PATH: &str = "maps/api/geocode/json";
const ROUTE_MATRIX_PATH: &str = "distanceMatrix/v2:computeRouteMatrix";
const ROUTE_MATRIX_FIELD_MASK: &str =
    "originIndex,destinationIndex,duration,distanceMeters,status";

pub struct MapsClient {
    client: Client,
    api_key: String,
    geocode_url: Url,
    route_matrix_url: Url,
}

impl MapsClient {
    /// Creates a client from explicit credentials and endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`MapsError::InvalidBaseUrl`] if either base URL
    /// does not parse.
    pub fn new(config: &MapsConfig) -> Result<Self, MapsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            geocode_url: join_base(&config.geocode_base_url, GEOCODE_PATH)?,
            route_matrix_url: join_base(&config.routes_base_url, ROUTE_MATRIX_PATH)?,
        })
    }

    /// Forward-geocodes `address` to the first result's coordinate.
    ///
    /// Returns `Ok(None)` when the provider has no match for the address.
    ///
    /// # Errors
    ///
    /// - [`MapsError::GeocodeStatus`] if the provider rejects the request.
    /// - [`MapsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MapsError::Deserialize`] if the body is not a geocoding response.
    pub async fn resolve_coordinates(
        &self,
        address: &str,
    ) -> Result<Option<Coordinate>, MapsError> {
        let response = self.geocode(&[("address", address)]).await?;
        check_geocode_status(&response)?;

        let coordinate = response
            .results
            .into_iter()
            .next()
            .and_then(|result| result.geometry)
            .map(|geometry| Coordinate {
                latitude: geometry.location.lat,
                longitude: geometry.location.lng,
            });

        match coordinate {
            Some(c) => tracing::debug!(address, lat = c.latitude, lng = c.longitude, "geocoded"),
            None => tracing::warn!(address, "geocoder returned no match"),
        }
        Ok(coordinate)
    }

    /// Reverse-geocodes `coordinate` to a coarse place name.
    ///
    /// Scans the first result's address components for a `locality` or
    /// `postal_town` entry and returns its long name. Falls back to
    /// [`UNKNOWN_PLACE`] when there is no result, no such component, or the
    /// provider reports a non-OK status.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Http`] on network failure or non-2xx HTTP status,
    /// or [`MapsError::Deserialize`] if the body is not a geocoding response.
    pub async fn resolve_place_name(&self, coordinate: Coordinate) -> Result<String, MapsError> {
        let latlng = coordinate.to_query_value();
        let response = self.geocode(&[("latlng", latlng.as_str())]).await?;

        if let Err(e) = check_geocode_status(&response) {
            tracing::error!(latlng, error = %e, "reverse geocoding rejected; using fallback place name");
            return Ok(UNKNOWN_PLACE.to_string());
        }

        let place = response
            .results
            .first()
            .and_then(|result| {
                result
                    .address_components
                    .iter()
                    .find(|component| component.is_locality())
            })
            .map_or_else(|| UNKNOWN_PLACE.to_string(), |c| c.long_name.clone());

        Ok(place)
    }

    /// Queries the driving distance in meters for one route segment.
    ///
    /// `from_index` and `to_index` identify the segment's waypoints and are
    /// only used to label a failure.
    ///
    /// # Errors
    ///
    /// - [`MapsError::SegmentDistance`] carrying the raw provider payload when
    ///   the response has no `distanceMeters` on its first element (including
    ///   provider error bodies).
    /// - [`MapsError::Http`] on network failure.
    pub async fn segment_distance_meters(
        &self,
        from_index: usize,
        to_index: usize,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<f64, MapsError> {
        let body = RouteMatrixRequest::single_pair(from, to);
        let response = self
            .client
            .post(self.route_matrix_url.clone())
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", ROUTE_MATRIX_FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let payload = serde_json::from_str::<serde_json::Value>(&text)
            .unwrap_or(serde_json::Value::String(text));

        match first_distance_meters(&payload) {
            Some(meters) if status.is_success() => Ok(meters),
            _ => {
                tracing::warn!(
                    from_index,
                    to_index,
                    status = status.as_u16(),
                    "route matrix response missing distanceMeters"
                );
                Err(MapsError::SegmentDistance {
                    from_index,
                    to_index,
                    payload,
                })
            }
        }
    }

    fn build_geocode_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.geocode_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    async fn geocode(&self, params: &[(&str, &str)]) -> Result<GeocodeResponse, MapsError> {
        let url = self.build_geocode_url(params);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MapsError::Deserialize {
            context: "geocode".to_string(),
            source: e,
        })
    }
}

/// `OK` and `ZERO_RESULTS` are answers; any other status is a rejected request.
fn check_geocode_status(response: &GeocodeResponse) -> Result<(), MapsError> {
    match response.status.as_str() {
        "" | "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(MapsError::GeocodeStatus {
            status: other.to_string(),
            message: response
                .error_message
                .clone()
                .unwrap_or_else(|| "no error message".to_string()),
        }),
    }
}

/// Joins `path` onto `base`, keeping any path prefix the base already has.
fn join_base(base: &str, path: &str) -> Result<Url, MapsError> {
    let normalised = format!("{}/", base.trim_end_matches('/'));
    Url::parse(&normalised)
        .and_then(|u| u.join(path))
        .map_err(|e| MapsError::InvalidBaseUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })
}
