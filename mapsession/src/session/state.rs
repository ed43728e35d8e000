//! Session state aggregate and map type.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::coord::{Coordinate, MapRegion};
use crate::places::{NearbyPlace, Place};

/// Label given to the place shown when the searched-location marker is tapped.
pub const SELECTED_LOCATION_LABEL: &str = "Selected Location";

/// Base map style shown by the rendering widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MapType {
    /// Satellite imagery with road and label overlay
    #[default]
    Hybrid,
    /// Satellite imagery only
    Satellite,
    /// Street map
    Standard,
    /// Topographic map
    Terrain,
}

impl MapType {
    /// All map types, in selector order.
    pub const ALL: [MapType; 4] = [
        MapType::Hybrid,
        MapType::Satellite,
        MapType::Standard,
        MapType::Terrain,
    ];

    /// Config / wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::Hybrid => "hybrid",
            MapType::Satellite => "satellite",
            MapType::Standard => "standard",
            MapType::Terrain => "terrain",
        }
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a map type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown map type '{0}'")]
pub struct UnknownMapType(pub String);

impl FromStr for MapType {
    type Err = UnknownMapType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hybrid" => Ok(MapType::Hybrid),
            "satellite" => Ok(MapType::Satellite),
            "standard" => Ok(MapType::Standard),
            "terrain" => Ok(MapType::Terrain),
            _ => Err(UnknownMapType(s.to_string())),
        }
    }
}

/// Everything the map screen shows, owned by the session controller.
///
/// A fresh state has every optional field absent. Renderers get it by
/// shared reference or as a [`super::MapScene`] snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    /// Latest device fix
    pub user_location: Option<Coordinate>,
    /// Visible viewport
    pub region: Option<MapRegion>,
    /// Contents of the search box
    pub search_text: String,
    /// Place shown in the detail panel
    pub selected_place: Option<Place>,
    /// Most recent successful search result
    pub searched_place: Option<Place>,
    /// Points of interest around the searched place, in service order
    pub nearby_places: Vec<NearbyPlace>,
    /// Whether the detail panel is open
    pub place_detail_visible: bool,
    /// Base map style
    pub map_type: MapType,
}

impl SessionState {
    /// Creates the state for a freshly mounted screen.
    pub fn new(map_type: MapType) -> Self {
        Self {
            map_type,
            ..Self::default()
        }
    }

    /// Whether a search result is currently displayed.
    pub fn has_search_result(&self) -> bool {
        self.searched_place.is_some()
    }
}
