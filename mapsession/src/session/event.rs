//! Events reported by [`super::MapSessionController::next_event`].

use super::error::SessionError;
use crate::coord::Coordinate;
use crate::places::Place;

/// Outcome of one unit of asynchronous session work.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A location fix was applied.
    LocationUpdated {
        location: Coordinate,
        /// True if this fix seeded the initial region
        region_initialized: bool,
    },

    /// The platform closed the position stream.
    TrackingEnded,

    /// A search resolved and the map moved to it.
    SearchResolved(Place),

    /// The search matched nothing. Not an alert.
    SearchNoResults { query: String },

    /// The search failed; state is unchanged.
    SearchFailed(SessionError),

    /// The nearby list was replaced.
    NearbyUpdated { count: usize },

    /// The nearby fetch failed and the list was emptied.
    NearbyCleared,
}

impl SessionEvent {
    /// Message for a blocking user alert, if this event warrants one.
    pub fn alert_message(&self) -> Option<String> {
        match self {
            SessionEvent::SearchFailed(err) => Some(err.to_string()),
            _ => None,
        }
    }
}
