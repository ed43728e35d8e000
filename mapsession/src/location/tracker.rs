//! Location tracker and its subscription handle.
//!
//! The tracker turns the platform's callback-style position watch into an
//! owned [`Subscription`]: fixes are read from it with [`Subscription::recv`],
//! and the underlying watch is released exactly once, either by
//! [`Subscription::stop`] or when the subscription is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::device::{Accuracy, DeviceLocation, PermissionStatus, PositionWatch};
use super::error::LocationError;
use crate::coord::Coordinate;

/// Buffered fixes between the platform callback and the consumer.
const FIX_CHANNEL_CAPACITY: usize = 16;

/// Starts and stops continuous position updates.
///
/// A tracker owns at most one live subscription at a time.
pub struct LocationTracker<D: DeviceLocation> {
    device: D,
    active: Arc<AtomicBool>,
}

impl<D: DeviceLocation> LocationTracker<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests permission and opens a high-accuracy watch.
    ///
    /// # Errors
    ///
    /// - [`LocationError::PermissionDenied`] if the user refuses access
    /// - [`LocationError::AlreadyTracking`] if a subscription is still live
    /// - [`LocationError::Unavailable`] if the platform cannot start the watch
    pub async fn start(&self) -> Result<Subscription, LocationError> {
        if self.is_tracking() {
            return Err(LocationError::AlreadyTracking);
        }

        if self.device.request_permission().await == PermissionStatus::Denied {
            warn!("Location permission denied");
            return Err(LocationError::PermissionDenied);
        }

        // Re-checked after the await so two concurrent starts cannot both win.
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(LocationError::AlreadyTracking);
        }

        let (tx, rx) = mpsc::channel(FIX_CHANNEL_CAPACITY);
        let watch = match self.device.watch_position(Accuracy::High, tx) {
            Ok(watch) => watch,
            Err(e) => {
                self.active.store(false, Ordering::Release);
                warn!(error = %e, "Failed to start position watch");
                return Err(e);
            }
        };

        info!("Location tracking started");

        Ok(Subscription {
            fixes: rx,
            watch: Some(watch),
            active: Arc::clone(&self.active),
        })
    }

    /// Releases a subscription. Equivalent to [`Subscription::stop`].
    pub fn stop(&self, subscription: Subscription) {
        subscription.stop();
    }

    /// Returns true while a subscription from this tracker is live.
    pub fn is_tracking(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// A live position watch.
///
/// Dropping the subscription releases the watch.
pub struct Subscription {
    fixes: mpsc::Receiver<Coordinate>,
    watch: Option<Box<dyn PositionWatch>>,
    active: Arc<AtomicBool>,
}

impl Subscription {
    /// Waits for the next fix.
    ///
    /// Returns `None` once the subscription is released or the platform
    /// closes the stream.
    pub async fn recv(&mut self) -> Option<Coordinate> {
        if self.watch.is_none() {
            return None;
        }
        self.fixes.recv().await
    }

    /// Returns true until the watch has been released.
    pub fn is_active(&self) -> bool {
        self.watch.is_some()
    }

    /// Releases the watch.
    pub fn stop(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.remove();
            self.fixes.close();
            self.active.store(false, Ordering::Release);
            debug!("Position watch released");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
