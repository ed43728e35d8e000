//! Default values and constants for all configuration settings.

use super::settings::*;
use crate::places::{DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_METERS, DEFAULT_TIMEOUT_SECS};
use crate::region::{DEFAULT_SEARCH_DELTA, DEFAULT_USER_DELTA, DEFAULT_ZOOM_FACTOR};
use crate::session::MapType;

/// Default place service base URL.
pub const DEFAULT_SERVICE_BASE_URL: &str = "https://api.openrouteservice.org";

/// Default HTTP timeout for place services (seconds).
pub const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT_SECS;

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            service: ServiceSettings {
                base_url: DEFAULT_SERVICE_BASE_URL.to_string(),
                api_key: None,
                timeout: DEFAULT_SERVICE_TIMEOUT_SECS,
            },
            nearby: NearbySettings {
                radius_meters: DEFAULT_NEARBY_RADIUS_METERS,
                limit: DEFAULT_NEARBY_LIMIT,
            },
            map: MapSettings {
                map_type: MapType::default(),
                search_delta: DEFAULT_SEARCH_DELTA,
                user_delta: DEFAULT_USER_DELTA,
                zoom_factor: DEFAULT_ZOOM_FACTOR,
            },
        }
    }
}
