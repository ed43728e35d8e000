//! Place types and the shared error taxonomy for place services.

use thiserror::Error;

use crate::coord::Coordinate;

/// Label used when a feature carries no usable name.
pub const UNNAMED_PLACE: &str = "Unnamed place";

/// A named location: a search result or a nearby point of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    label: String,
    location: Coordinate,
}

impl Place {
    pub fn new(label: impl Into<String>, location: Coordinate) -> Self {
        Self {
            label: label.into(),
            location,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }
}

/// Nearby points of interest share the [`Place`] shape.
pub type NearbyPlace = Place;

/// Errors returned by the geocoding and nearby-place services.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaceError {
    /// Transport failure or timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with an empty result set.
    #[error("No results found")]
    NoResults,

    /// Non-2xx status or an unusable service address.
    #[error("Service error: {0}")]
    Service(String),

    /// The payload could not be decoded into places.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors from [`crate::places::GeocodeClient`].
pub type GeocodeError = PlaceError;

/// Errors from [`crate::places::NearbyPlacesClient`].
pub type NearbyError = PlaceError;

/// Where a place service lives and how to authenticate against it.
#[derive(Clone)]
pub struct ServiceEndpoint {
    base_url: String,
    api_key: Option<String>,
}

impl ServiceEndpoint {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL.
    pub(crate) fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// The `Authorization` header, if a key is configured.
    ///
    /// The key is sent as-is, which is what the service expects.
    pub(crate) fn auth_header(&self) -> Option<(&'static str, &str)> {
        self.api_key.as_deref().map(|key| ("Authorization", key))
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for ServiceEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceEndpoint")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
