//! MapSession - map state and search coordination for a single map screen
//!
//! Tracks the device position, resolves free-text searches through a
//! geocoding service, lists points of interest around the result, and
//! derives zoom and recenter transforms for the visible region. Rendering
//! and permission prompts stay with the host application.
//!
//! # High-Level API
//!
//! ```ignore
//! use mapsession::config::SessionConfig;
//! use mapsession::location::{BridgeLocationSource, PermissionStatus};
//! use mapsession::session::ServiceSessionController;
//!
//! let config = SessionConfig::load()?;
//! let device = BridgeLocationSource::new(PermissionStatus::Granted);
//! let mut session = ServiceSessionController::with_service(&config, device.clone())?;
//!
//! session.mount().await?;
//! session.search_for("Brandenburg Gate");
//! while let Some(event) = session.next_event().await {
//!     if let Some(message) = event.alert_message() {
//!         show_alert(&message);
//!     }
//!     render(session.scene());
//! }
//! ```

pub mod config;
pub mod coord;
pub mod location;
pub mod logging;
pub mod places;
pub mod region;
pub mod session;

/// Version of the MapSession library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
