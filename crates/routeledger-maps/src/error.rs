use thiserror::Error;

/// Errors returned by the maps client and the route segmenter.
#[derive(Debug, Error)]
pub enum MapsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The geocoder returned no match for an address.
    #[error("failed to get coordinates for address: {address}")]
    UnresolvedLocation { address: String },

    /// The geocoder rejected the request (bad key, quota, malformed query).
    #[error("geocoding provider returned {status}: {message}")]
    GeocodeStatus { status: String, message: String },

    /// The routing provider answered without a usable `distanceMeters`.
    #[error("failed to get distance between segment {from_index}-{to_index}")]
    SegmentDistance {
        from_index: usize,
        to_index: usize,
        payload: serde_json::Value,
    },

    #[error("a route needs at least two waypoints, got {0}")]
    TooFewWaypoints(usize),
}

impl MapsError {
    /// Raw provider payload for diagnosis, when the failure carries one.
    #[must_use]
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            MapsError::SegmentDistance { payload, .. } => Some(payload),
            _ => None,
        }
    }
}
