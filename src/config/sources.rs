//! Configuration sources: TOML files and TREESTATE_* environment variables.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

/// Environment prefix; nested keys use `__` (e.g. `TREESTATE_LOGGING__LEVEL`).
pub const ENV_PREFIX: &str = "TREESTATE";

/// Add a TOML file overlay.
pub fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let name = path
        .to_str()
        .ok_or_else(|| ConfigError::Message(format!("Non UTF-8 config path: {:?}", path)))?;
    Ok(builder.add_source(
        File::new(name, FileFormat::Toml).required(required),
    ))
}

/// Add the environment variable overlay.
pub fn add_environment(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    ))
}

/// Per-user config file (`<config dir>/treestate/config.toml`), if the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "treestate", "treestate")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
