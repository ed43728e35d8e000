//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use crate::places::ServiceEndpoint;
use crate::region::RegionSpans;
use crate::session::MapType;

/// Complete session configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Place service settings
    pub service: ServiceSettings,
    /// Nearby search settings
    pub nearby: NearbySettings,
    /// Map display settings
    pub map: MapSettings,
}

/// Geocoding / POI service configuration.
#[derive(Clone, PartialEq)]
pub struct ServiceSettings {
    /// Base URL shared by the geocoding and POI endpoints
    pub base_url: String,
    /// API key sent in the Authorization header
    pub api_key: Option<String>,
    /// HTTP timeout in seconds
    pub timeout: u64,
}

impl ServiceSettings {
    /// Endpoint description for the place clients.
    pub fn endpoint(&self) -> ServiceEndpoint {
        ServiceEndpoint::new(self.base_url.clone(), self.api_key.clone())
    }
}

impl std::fmt::Debug for ServiceSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Nearby points-of-interest configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySettings {
    /// Search radius around a resolved place, in meters
    pub radius_meters: f64,
    /// Maximum number of nearby places kept
    pub limit: usize,
}

/// Map display configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    /// Initial map type
    pub map_type: MapType,
    /// Span of the wide view around search results and the first fix
    pub search_delta: f64,
    /// Span of the close view around the user
    pub user_delta: f64,
    /// Zoom step factor
    pub zoom_factor: f64,
}

impl MapSettings {
    /// Region spans for the [`crate::region::RegionController`].
    pub fn spans(&self) -> RegionSpans {
        RegionSpans {
            zoom_factor: self.zoom_factor,
            search_delta: self.search_delta,
            user_delta: self.user_delta,
        }
    }
}
