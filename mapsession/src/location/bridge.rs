//! Host-fed location source.
//!
//! Mobile hosts receive permission results and fixes through platform
//! callbacks. [`BridgeLocationSource`] lets them forward those callbacks into
//! the tracker: the host records the permission outcome and calls
//! [`BridgeLocationSource::publish`] for each fix.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use super::device::{Accuracy, DeviceLocation, PermissionStatus, PositionWatch};
use super::error::LocationError;
use crate::coord::Coordinate;

#[derive(Default)]
struct BridgeState {
    permission: PermissionStatus,
    watchers: HashMap<u64, mpsc::Sender<Coordinate>>,
    next_id: u64,
}

/// A [`DeviceLocation`] fed by the host application.
#[derive(Clone, Default)]
pub struct BridgeLocationSource {
    inner: Arc<Mutex<BridgeState>>,
}

impl BridgeLocationSource {
    /// Creates a bridge that answers permission requests with `permission`.
    pub fn new(permission: PermissionStatus) -> Self {
        let bridge = Self::default();
        bridge.set_permission(permission);
        bridge
    }

    /// Records the outcome of the platform permission prompt.
    pub fn set_permission(&self, permission: PermissionStatus) {
        self.inner.lock().permission = permission;
    }

    /// Forwards a fix to every open watch.
    ///
    /// Returns how many watches accepted it. A watch whose buffer is full
    /// misses this fix; the next one supersedes it anyway.
    pub fn publish(&self, fix: Coordinate) -> usize {
        let state = self.inner.lock();
        state
            .watchers
            .values()
            .filter(|tx| match tx.try_send(fix) {
                Ok(()) => true,
                Err(e) => {
                    trace!(error = %e, "Dropping fix for busy or closed watch");
                    false
                }
            })
            .count()
    }

    /// Number of watches currently open.
    pub fn watcher_count(&self) -> usize {
        self.inner.lock().watchers.len()
    }
}

impl DeviceLocation for BridgeLocationSource {
    async fn request_permission(&self) -> PermissionStatus {
        self.inner.lock().permission
    }

    fn watch_position(
        &self,
        accuracy: Accuracy,
        fixes: mpsc::Sender<Coordinate>,
    ) -> Result<Box<dyn PositionWatch>, LocationError> {
        let mut state = self.inner.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.watchers.insert(id, fixes);
        trace!(id, ?accuracy, "Bridge watch opened");

        Ok(Box::new(BridgeWatch {
            id,
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct BridgeWatch {
    id: u64,
    inner: Arc<Mutex<BridgeState>>,
}

impl PositionWatch for BridgeWatch {
    fn remove(self: Box<Self>) {
        self.inner.lock().watchers.remove(&self.id);
        trace!(id = self.id, "Bridge watch removed");
    }
}
