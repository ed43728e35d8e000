//! Session configuration.
//!
//! Settings are grouped by INI section and loaded from
//! `~/.mapsession/config.ini`; a missing file yields defaults.
//!
//! # Example
//!
//! ```
//! use mapsession::config::SessionConfig;
//!
//! let config = SessionConfig::default();
//! assert_eq!(config.nearby.limit, 5);
//! assert_eq!(config.nearby.radius_meters, 1000.0);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{DEFAULT_SERVICE_BASE_URL, DEFAULT_SERVICE_TIMEOUT_SECS};
pub use file::{config_directory, config_directory_in, config_file_path, ConfigFileError};
pub use settings::{MapSettings, NearbySettings, ServiceSettings, SessionConfig};
