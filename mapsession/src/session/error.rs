//! Session-level error aggregate.

use thiserror::Error;

use crate::location::LocationError;
use crate::places::PlaceError;

/// Any error the session surfaces to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Location tracking could not start
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Place search failed
    #[error(transparent)]
    Place(#[from] PlaceError),
}

impl SessionError {
    /// True for a denied location permission.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, SessionError::Location(LocationError::PermissionDenied))
    }
}
