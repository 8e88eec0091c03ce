//! Core types shared across the tree-state engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path separator used when joining node names.
pub const SEPARATOR: char = '/';

/// Path: slash-joined, root-relative sequence of node names (e.g. `src/app/main.ts`)
pub type TreePath = String;

/// NodeId: identity assigned by the lazy index to a node it has materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
