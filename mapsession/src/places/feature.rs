//! GeoJSON feature collection decoding.
//!
//! Both place services answer with a feature collection whose point
//! geometries are ordered `[longitude, latitude]`. This is the only place
//! that order is handled; everything it returns is a latitude-first
//! [`Coordinate`].

use serde::Deserialize;

use super::types::{Place, PlaceError, UNNAMED_PLACE};
use crate::coord::Coordinate;

#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    #[serde(default)]
    pub(crate) features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    label: Option<String>,
    name: Option<String>,
    osm_tags: Option<OsmTags>,
}

#[derive(Debug, Deserialize)]
struct OsmTags {
    name: Option<String>,
}

impl FeatureCollection {
    /// Decodes a response body.
    pub(crate) fn from_slice(body: &[u8]) -> Result<Self, PlaceError> {
        serde_json::from_slice(body).map_err(|e| PlaceError::MalformedResponse(e.to_string()))
    }
}

impl Feature {
    /// Converts the feature into a [`Place`].
    ///
    /// Label preference: `label`, then `name`, then `osm_tags.name`.
    pub(crate) fn into_place(self) -> Result<Place, PlaceError> {
        let coordinates = self
            .geometry
            .map(|g| g.coordinates)
            .ok_or_else(|| PlaceError::MalformedResponse("feature has no geometry".into()))?;

        let (longitude, latitude) = match coordinates.as_slice() {
            [lon, lat, ..] => (*lon, *lat),
            _ => {
                return Err(PlaceError::MalformedResponse(format!(
                    "expected [lon, lat], got {} values",
                    coordinates.len()
                )))
            }
        };

        let location = Coordinate::new(latitude, longitude)
            .map_err(|e| PlaceError::MalformedResponse(e.to_string()))?;

        let Properties {
            label,
            name,
            osm_tags,
        } = self.properties;
        let label = label
            .or(name)
            .or_else(|| osm_tags.and_then(|t| t.name))
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| UNNAMED_PLACE.to_string());

        Ok(Place::new(label, location))
    }
}
