//! INI serialization logic for converting `SessionConfig` → INI string.

use super::settings::SessionConfig;

/// Convert a `SessionConfig` to a commented INI string for saving.
pub(super) fn to_config_string(config: &SessionConfig) -> String {
    let api_key = config.service.api_key.as_deref().unwrap_or("");

    format!(
        r#"[service]
; Base URL of the geocoding and points-of-interest service
base_url = {}
; API key sent in the Authorization header
api_key = {}
; HTTP timeout in seconds
timeout = {}

[nearby]
; Radius around a search result to look for points of interest (meters)
radius_meters = {}
; Maximum number of nearby places listed
limit = {}

[map]
; Map type: hybrid, satellite, standard, terrain
type = {}
; Span (degrees) of the wide view around search results
search_delta = {}
; Span (degrees) of the close view when centering on your location
user_delta = {}
; Zoom step factor
zoom_factor = {}
"#,
        config.service.base_url,
        api_key,
        config.service.timeout,
        config.nearby.radius_meters,
        config.nearby.limit,
        config.map.map_type,
        config.map.search_delta,
        config.map.user_delta,
        config.map.zoom_factor,
    )
}
