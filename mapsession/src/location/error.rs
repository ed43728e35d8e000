//! Error types for location tracking.

use thiserror::Error;

/// Errors that can occur when starting location tracking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user refused foreground location access.
    #[error("Permission to access location was denied")]
    PermissionDenied,

    /// This tracker already holds a live subscription.
    #[error("Location tracking is already active")]
    AlreadyTracking,

    /// The platform could not start a position watch.
    #[error("Location service unavailable: {0}")]
    Unavailable(String),
}
