//! Registry configuration, optionally loaded from a `vitrine.toml` file.
//!
//! ```toml
//! [presenter]
//! max_depth = 32
//! passthrough_stateless = true
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Default recursion limit for nested presentation.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tunables for a [`crate::PresenterRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Deepest nesting `present` will follow before failing with
    /// [`crate::PresentationError::DepthExceeded`].
    pub max_depth: usize,
    /// Whether stateless objects without a presenter pass through unchanged.
    /// Scalars always pass through regardless.
    pub passthrough_stateless: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            passthrough_stateless: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    presenter: RegistryConfig,
}

impl RegistryConfig {
    /// Parses the `[presenter]` table of a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(file.presenter)
    }

    /// Reads and parses a config file.
    pub fn try_load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads a config file, falling back to defaults when it is missing or invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No presenter config found at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                info!("Loaded presenter config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("{}. Falling back to default presenter config.", e);
                Self::default()
            }
        }
    }
}
