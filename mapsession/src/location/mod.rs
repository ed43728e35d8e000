//! Live device position.
//!
//! # Architecture
//!
//! ```text
//! DeviceLocation (platform / BridgeLocationSource)
//!     │  permission request, high-accuracy watch
//!     ▼
//! LocationTracker::start() ──► Subscription ──► recv() fixes
//!                                   │
//!                                   └── stop() / Drop releases the watch once
//! ```

mod bridge;
mod device;
mod error;
mod tracker;

pub use bridge::BridgeLocationSource;
pub use device::{Accuracy, DeviceLocation, PermissionStatus, PositionWatch};
pub use error::LocationError;
pub use tracker::{LocationTracker, Subscription};

#[cfg(test)]
pub use tracker::tests::MockDevice;
