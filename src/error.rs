//! Error types for the tree-state engine

use crate::types::NodeId;
use thiserror::Error;

/// Errors raised by path resolution, the lazy index and selection.
///
/// None of these are fatal: callers are expected to degrade to an inert tree
/// (nothing selected, nothing expanded) rather than abort.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("no node at path '{0}'")]
    NotFound(String),

    #[error("node {0} is not attached to the index")]
    DetachedNode(NodeId),

    #[error("invalid node name '{0}': names must be non-empty and must not contain '/'")]
    InvalidName(String),

    #[error("data source failed: {0}")]
    Source(String),

    #[error("fetch abandoned: the index was reset while it was in flight")]
    Stale,
}

/// Errors surfaced by the host-facing layers (CLI, config, logging, ingestion).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid tree document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
