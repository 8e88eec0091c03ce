//! Configuration
//!
//! `TreeStateConfig` is layered from built-in defaults, an optional TOML file
//! and `TREESTATE_*` environment variables (highest precedence).

mod facade;
mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::selection::SelectionPolicy;
use crate::tree::WalkerConfig;
use crate::views::IconTheme;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeStateConfig {
    /// When false, clicking a folder only toggles expansion
    pub folder_selectable: bool,

    pub icons: IconTheme,

    pub scan: ScanConfig,

    pub logging: LoggingConfig,
}

impl TreeStateConfig {
    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            folder_selectable: self.folder_selectable,
        }
    }
}

/// Directory ingestion settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub max_depth: Option<usize>,
    pub include_hidden: bool,
    pub follow_symlinks: bool,
}

impl ScanConfig {
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            max_depth: self.max_depth,
            include_hidden: self.include_hidden,
            follow_symlinks: self.follow_symlinks,
        }
    }
}
