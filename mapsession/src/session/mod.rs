//! Map session coordination.
//!
//! # Flow
//!
//! ```text
//! mount() ──► LocationTracker ──► fixes ─┐
//!                                        ├─► next_event() ──► SessionState
//! search_for() ──► GeocodeClient ────────┤        │
//!                     └─► NearbyPlacesClient ─────┘
//!
//! scene() ──► MapScene (read-only snapshot for the map widget)
//! ```

mod controller;
mod error;
mod event;
mod scene;
mod state;

pub use controller::{MapSessionController, ServiceSessionController};
pub use error::SessionError;
pub use event::SessionEvent;
pub use scene::{Circle, MapScene, Marker, SEARCHED_MARKER_TITLE};
pub use state::{MapType, SessionState, UnknownMapType, SELECTED_LOCATION_LABEL};
