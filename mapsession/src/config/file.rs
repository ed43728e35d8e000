//! Reading and writing `config.ini`.
//!
//! The host loads a [`SessionConfig`] once per screen; a missing file means
//! defaults. Key mapping lives in [`super::parser`], serialization in
//! [`super::writer`].

use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::{debug, info};

use super::settings::SessionConfig;

/// Directory under the home directory holding session files.
const CONFIG_DIR_NAME: &str = ".mapsession";

/// Config file name inside [`CONFIG_DIR_NAME`].
const CONFIG_FILE_NAME: &str = "config.ini";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but could not be read or parsed as INI
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// The file or its directory could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A key holds a value outside its allowed range
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl SessionConfig {
    /// Loads `~/.mapsession/config.ini`, or defaults if it is absent.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Loads `path`, or defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = super::parser::parse_ini(&ini)?;

        info!(path = %path.display(), "Loaded session config");
        Ok(config)
    }

    /// Writes the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        let write_error = |source| ConfigFileError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, super::writer::to_config_string(self)).map_err(write_error)
    }
}

/// Session directory under `home`.
pub fn config_directory_in(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR_NAME)
}

/// Session directory under the user's home (`~/.mapsession`).
///
/// Falls back to the working directory when no home is known.
pub fn config_directory() -> PathBuf {
    config_directory_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
}

/// Default config file location (`~/.mapsession/config.ini`).
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}
