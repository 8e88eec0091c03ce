//! ConfigLoader facade composing the configuration sources.

use super::sources;
use super::TreeStateConfig;
use config::{Config, ConfigError};
use std::path::Path;
use tracing::debug;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the per-user file (if present) and environment.
    ///
    /// Precedence: defaults (lowest) -> user file -> environment (highest).
    pub fn load() -> Result<TreeStateConfig, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = sources::user_config_path() {
            debug!(path = %path.display(), "Checking user config file");
            builder = sources::add_file(builder, &path, false)?;
        }
        let builder = sources::add_environment(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<TreeStateConfig, ConfigError> {
        let builder = sources::add_file(Config::builder(), path, true)?;
        let builder = sources::add_environment(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Load from a file when one is given, otherwise from the standard locations.
    pub fn load_or_default(path: Option<&Path>) -> Result<TreeStateConfig, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    /// Create default configuration.
    pub fn default() -> TreeStateConfig {
        TreeStateConfig::default()
    }
}
