//! Device location provider interface.

use std::future::Future;

use tokio::sync::mpsc;

use super::error::LocationError;
use crate::coord::Coordinate;

/// Result of a foreground location permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    Granted,
    #[default]
    Denied,
}

/// Requested fix accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accuracy {
    Balanced,
    #[default]
    High,
}

/// Handle to an active OS-level position watch.
pub trait PositionWatch: Send {
    /// Stops the watch. Called exactly once per handle.
    fn remove(self: Box<Self>);
}

/// The platform's location service.
///
/// Implemented by the host application (or [`super::BridgeLocationSource`])
/// on top of whatever the OS offers.
pub trait DeviceLocation: Send + Sync {
    /// Asks the user for foreground location access.
    fn request_permission(&self) -> impl Future<Output = PermissionStatus> + Send;

    /// Starts pushing fixes into `fixes` until the returned handle is removed.
    fn watch_position(
        &self,
        accuracy: Accuracy,
        fixes: mpsc::Sender<Coordinate>,
    ) -> Result<Box<dyn PositionWatch>, LocationError>;
}
