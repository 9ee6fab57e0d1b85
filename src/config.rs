//! Server configuration module.
//!
//! Handles loading and validating `varicache.toml`. Every value has a
//! default, so the file is optional and may be sparse. Command line flags
//! override whatever the file says.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! bind = "127.0.0.1:8080"   # Address the HTTP listener binds to
//!
//! [storage]
//! root = "storage"          # Directory holding one subdirectory per container
//!
//! [images]
//! max_dimension = 8192      # Largest width/height a variant name may request
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Limits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Server configuration loaded from `varicache.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// HTTP listener settings.
    pub server: ListenConfig,
    /// Object store settings.
    pub storage: StorageConfig,
    /// Variant generation settings.
    pub images: ImagesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListenConfig {
    pub bind: SocketAddr,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Root directory of the filesystem store.
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("storage"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Requests for a larger width or height fail without decoding.
    pub max_dimension: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_dimension: Limits::default().max_dimension,
        }
    }
}

impl ServerConfig {
    /// Load from `path`. A missing file yields the defaults; an unreadable or
    /// invalid one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "images.max_dimension must be non-zero".into(),
            ));
        }
        if self.storage.root.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "storage.root must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_dimension: self.images.max_dimension,
        }
    }
}

/// Generate a documented stock `varicache.toml`.
pub fn stock_config_toml() -> String {
    let defaults = ServerConfig::default();
    format!(
        r#"# varicache configuration
# All options are optional. Values shown are the defaults.

[server]
# Address the HTTP listener binds to.
bind = "{bind}"

[storage]
# Directory holding one subdirectory per container (bucket).
root = "{root}"

[images]
# Largest width or height a variant name may request, e.g. photo_w8192.webp.
max_dimension = {max_dimension}
"#,
        bind = defaults.server.bind,
        root = defaults.storage.root.display(),
        max_dimension = defaults.images.max_dimension,
    )
}
