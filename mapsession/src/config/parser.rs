//! INI parsing logic for converting `Ini` → `SessionConfig`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::SessionConfig;
use crate::session::MapType;

/// Parse an `Ini` object into a `SessionConfig`.
///
/// Starts from `SessionConfig::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<SessionConfig, ConfigFileError> {
    let mut config = SessionConfig::default();

    // [service] section
    if let Some(section) = ini.section(Some("service")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !v.is_empty() {
                config.service.base_url = v.to_string();
            }
        }
        if let Some(v) = section.get("api_key") {
            let v = v.trim();
            if !v.is_empty() {
                config.service.api_key = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("timeout") {
            config.service.timeout = match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(invalid("service", "timeout", v, "must be a positive number of seconds")),
            };
        }
    }

    // [nearby] section
    if let Some(section) = ini.section(Some("nearby")) {
        if let Some(v) = section.get("radius_meters") {
            config.nearby.radius_meters = parse_positive(v)
                .ok_or_else(|| invalid("nearby", "radius_meters", v, "must be a positive number"))?;
        }
        if let Some(v) = section.get("limit") {
            config.nearby.limit = match v.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => return Err(invalid("nearby", "limit", v, "must be a positive integer")),
            };
        }
    }

    // [map] section
    if let Some(section) = ini.section(Some("map")) {
        if let Some(v) = section.get("type") {
            config.map.map_type = v.parse::<MapType>().map_err(|_| {
                invalid(
                    "map",
                    "type",
                    v,
                    "must be one of: hybrid, satellite, standard, terrain",
                )
            })?;
        }
        if let Some(v) = section.get("search_delta") {
            config.map.search_delta = parse_positive(v)
                .ok_or_else(|| invalid("map", "search_delta", v, "must be a positive number"))?;
        }
        if let Some(v) = section.get("user_delta") {
            config.map.user_delta = parse_positive(v)
                .ok_or_else(|| invalid("map", "user_delta", v, "must be a positive number"))?;
        }
        if let Some(v) = section.get("zoom_factor") {
            config.map.zoom_factor = parse_positive(v)
                .filter(|f| *f > 1.0)
                .ok_or_else(|| invalid("map", "zoom_factor", v, "must be greater than 1"))?;
        }
    }

    Ok(config)
}

/// Parse a finite, strictly positive float.
fn parse_positive(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
