//! Render snapshot handed to the map widget.
//!
//! The widget never sees [`SessionState`] directly; it draws a [`MapScene`]
//! built from it and sends gestures back as controller calls.

use super::state::{MapType, SessionState};
use crate::coord::{Coordinate, MapRegion};

/// Title of the marker placed on the searched location.
pub const SEARCHED_MARKER_TITLE: &str = "Location you searched for!";

/// A pin on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub title: String,
    pub draggable: bool,
}

/// A filled circle around a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Coordinate,
    pub radius_meters: f64,
}

/// Everything the widget needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub region: Option<MapRegion>,
    pub marker: Option<Marker>,
    pub circle: Option<Circle>,
    pub map_type: MapType,
    /// Label of the detail panel, present only while it is open
    pub detail_label: Option<String>,
    pub nearby_labels: Vec<String>,
    pub show_clear_button: bool,
}

impl MapScene {
    /// Builds the snapshot. `circle_radius_meters` is the nearby search radius.
    pub fn from_state(state: &SessionState, circle_radius_meters: f64) -> Self {
        let center = state.region.map(|region| region.center());

        let marker = center.map(|coordinate| Marker {
            coordinate,
            title: SEARCHED_MARKER_TITLE.to_string(),
            draggable: true,
        });

        let circle = center
            .filter(|_| state.has_search_result())
            .map(|center| Circle {
                center,
                radius_meters: circle_radius_meters,
            });

        let detail_label = if state.place_detail_visible {
            state
                .selected_place
                .as_ref()
                .map(|place| place.label().to_string())
        } else {
            None
        };

        Self {
            region: state.region,
            marker,
            circle,
            map_type: state.map_type,
            detail_label,
            nearby_labels: state
                .nearby_places
                .iter()
                .map(|place| place.label().to_string())
                .collect(),
            show_clear_button: !state.search_text.is_empty(),
        }
    }
}
