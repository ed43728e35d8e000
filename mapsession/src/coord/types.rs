//! Coordinate and viewport type definitions

use std::fmt;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// A geographic position in decimal degrees.
///
/// Always latitude first. Services that speak `[longitude, latitude]`
/// convert at their own boundary (see [`crate::places`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, validating both axes.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::InvalidLatitude`] or [`CoordError::InvalidLongitude`]
    /// when a value is outside its range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(CoordError::InvalidLatitude(latitude));
        }
        if !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(CoordError::InvalidLongitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees (-90 to 90).
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees (-180 to 180).
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// The visible map viewport: a center and an angular span on each axis.
///
/// Both deltas are strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    center: Coordinate,
    latitude_delta: f64,
    longitude_delta: f64,
}

impl MapRegion {
    /// Creates a region, rejecting non-positive or non-finite spans.
    pub fn new(
        center: Coordinate,
        latitude_delta: f64,
        longitude_delta: f64,
    ) -> Result<Self, CoordError> {
        if !is_valid_delta(latitude_delta) {
            return Err(CoordError::InvalidDelta(latitude_delta));
        }
        if !is_valid_delta(longitude_delta) {
            return Err(CoordError::InvalidDelta(longitude_delta));
        }

        Ok(Self {
            center,
            latitude_delta,
            longitude_delta,
        })
    }

    /// Creates a region with the same span on both axes.
    pub fn square(center: Coordinate, delta: f64) -> Result<Self, CoordError> {
        Self::new(center, delta, delta)
    }

    /// Builds a square region from a span the caller has already validated.
    pub(crate) fn from_valid_span(center: Coordinate, delta: f64) -> Self {
        debug_assert!(is_valid_delta(delta));
        Self {
            center,
            latitude_delta: delta,
            longitude_delta: delta,
        }
    }

    #[inline]
    pub fn center(&self) -> Coordinate {
        self.center
    }

    #[inline]
    pub fn latitude_delta(&self) -> f64 {
        self.latitude_delta
    }

    #[inline]
    pub fn longitude_delta(&self) -> f64 {
        self.longitude_delta
    }
}

/// Returns true if `delta` can be used as a viewport span.
#[inline]
pub(crate) fn is_valid_delta(delta: f64) -> bool {
    delta.is_finite() && delta > 0.0
}

/// Errors that can occur when constructing coordinates or regions.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range (-90.0 to 90.0)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Viewport span is zero, negative or not finite
    InvalidDelta(f64),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidDelta(delta) => {
                write!(
                    f,
                    "Invalid region span: {} (must be finite and greater than 0)",
                    delta
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
