//! CLI Tooling
//!
//! Host-side command-line surface: loads a tree from a JSON document or a
//! directory, drives the tree-state engine and prints the visible rows.

use crate::config::{ConfigLoader, TreeStateConfig};
use crate::engine::{EagerTreeState, LazyTreeState};
use crate::error::{ApiError, TreeError};
use crate::index::{DataSource, FsDataSource};
use crate::logging::LoggingConfig;
use crate::tree::{resolve, scan_directory, Tree};
use crate::views::{render_text, render_text_styled, VisibleRow};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{info, warn};

/// Treestate CLI - expansion, selection and path resolution for file trees
#[derive(Parser)]
#[command(name = "treestate")]
#[command(about = "Expansion, selection and path resolution state for interactive file trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line logging overrides on top of the configured values.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

/// Where the tree comes from
#[derive(Args, Clone, Debug)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// JSON document: an array of {"name", "type": "folder"|"file", "children"}
    #[arg(long)]
    pub tree: Option<PathBuf>,

    /// Directory on disk
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the visible rows of a tree
    Show {
        #[command(flatten)]
        source: SourceArgs,
        /// Fetch levels on demand instead of loading the whole tree
        #[arg(long)]
        lazy: bool,
        /// Start with every folder collapsed
        #[arg(long)]
        collapse_all: bool,
        /// Path to reveal and select
        #[arg(long)]
        select: Option<String>,
        /// Allow folders to be selected
        #[arg(long)]
        folder_selectable: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Resolve a path to a node
    Resolve {
        #[command(flatten)]
        source: SourceArgs,
        /// Slash-delimited path, e.g. src/app/main.ts
        path: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// CLI context for executing commands
pub struct CliContext {
    config: TreeStateConfig,
    color: bool,
}

impl CliContext {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load_or_default(config_path.as_deref())?;
        Ok(Self {
            config,
            color: std::io::stdout().is_terminal(),
        })
    }

    /// Context with an explicit configuration and uncolored output
    pub fn with_config(config: TreeStateConfig) -> Self {
        Self {
            config,
            color: false,
        }
    }

    pub fn config(&self) -> &TreeStateConfig {
        &self.config
    }

    /// Execute a command and return its printable output
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Show {
                source,
                lazy,
                collapse_all,
                select,
                folder_selectable,
                format,
            } => {
                let mut config = self.config.clone();
                config.folder_selectable |= *folder_selectable;
                let rows = if *lazy {
                    self.show_lazy(source, &config, select.as_deref())?
                } else {
                    let mut state = EagerTreeState::from_config(self.load_tree(source)?, &config);
                    if *collapse_all {
                        state.collapse_all();
                    }
                    if let Some(path) = select {
                        if let Err(err) = state.select_file(path) {
                            warn!(path = %path, error = %err, "Selection skipped");
                        }
                    }
                    state.visible_rows()
                };
                info!(rows = rows.len(), lazy = *lazy, "Rendered tree");
                format_rows(&rows, format, self.color)
            }
            Commands::Resolve { source, path } => {
                let found = match (&source.tree, &source.dir) {
                    (_, Some(dir)) => runtime()?.block_on(async {
                        let source = FsDataSource::from_scan(dir, &self.config.scan);
                        let index = crate::index::TreeIndex::new(source);
                        index.find_by_path(path).await.map(|n| n.node.kind())
                    }),
                    _ => {
                        let tree = self.load_tree(source)?;
                        resolve(tree.roots(), path).map(|n| n.kind())
                    }
                };
                match found {
                    Ok(kind) => Ok(format!("{} {}", kind.as_str(), path)),
                    Err(TreeError::NotFound(_)) => Ok(format!("not found: {}", path)),
                    Err(err) => Err(err.into()),
                }
            }
            Commands::Config => toml::to_string_pretty(&self.config).map_err(|e| {
                ApiError::ConfigError(format!("Failed to serialize configuration: {}", e))
            }),
        }
    }

    fn load_tree(&self, source: &SourceArgs) -> Result<Tree, ApiError> {
        match (&source.tree, &source.dir) {
            (Some(file), _) => Tree::from_json(&std::fs::read_to_string(file)?),
            (None, Some(dir)) => scan_directory(dir, &self.config.scan.walker_config()),
            (None, None) => Err(ApiError::ConfigError(
                "either --tree or --dir is required".to_string(),
            )),
        }
    }

    fn show_lazy(
        &self,
        source: &SourceArgs,
        config: &TreeStateConfig,
        select: Option<&str>,
    ) -> Result<Vec<VisibleRow>, ApiError> {
        let runtime = runtime()?;
        match &source.dir {
            Some(dir) => {
                let fs = FsDataSource::from_scan(dir, &config.scan);
                runtime.block_on(lazy_rows(LazyTreeState::from_config(fs, config), select))
            }
            None => {
                let tree = self.load_tree(source)?;
                runtime.block_on(lazy_rows(LazyTreeState::from_config(tree, config), select))
            }
        }
    }
}

async fn lazy_rows<S: DataSource>(
    mut state: LazyTreeState<S>,
    select: Option<&str>,
) -> Result<Vec<VisibleRow>, ApiError> {
    if let Some(path) = select {
        if let Err(err) = state.select_file(path).await {
            warn!(path = %path, error = %err, "Selection skipped");
        }
    }
    Ok(state.visible_rows().await?)
}

fn runtime() -> Result<tokio::runtime::Runtime, ApiError> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Format rows as indented text (selection highlighted on terminals) or JSON
pub fn format_rows(rows: &[VisibleRow], format: &str, color: bool) -> Result<String, ApiError> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(rows)?),
        "text" if color => Ok(render_text_styled(rows, |label| {
            label.bold().cyan().to_string()
        })),
        "text" => Ok(render_text(rows)),
        other => Err(ApiError::ConfigError(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}
