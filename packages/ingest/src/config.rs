//! TOML configuration.
//!
//! Every field has a default, so an absent file or an empty one is a valid
//! configuration:
//!
//! ```toml
//! data_dir = "./data"
//! max_pdf_pages = 5
//! history_limit = 100
//!
//! [driver_names]
//! A13JMD0G4ND0QP = "Michael Schmidt"
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "DSP_QUALITY_CONFIG";

/// Errors loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or has wrong field types.
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Ingestion settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Root directory of the file repository.
    pub data_dir: PathBuf,
    /// Pages loaded from a PDF.
    pub max_pdf_pages: usize,
    /// Upload history entries retained.
    pub history_limit: usize,
    /// Transporter ID to display name, for customer contact reports.
    pub driver_names: BTreeMap<String, String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            max_pdf_pages: 5,
            history_limit: 100,
            driver_names: BTreeMap::new(),
        }
    }
}

impl IngestConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Toml`] if the text is not a valid configuration
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Loads the configuration from `path`, or from the file named by
    /// [`CONFIG_ENV_VAR`], or falls back to the defaults.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Io`] if the named file cannot be read
    /// * [`ConfigError::Toml`] if it is not a valid configuration
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let Some(path) = path else {
            log::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }
}
