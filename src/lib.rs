//! Treestate: interactive file-tree state
//!
//! Tracks expansion, selection and path resolution for a hierarchical
//! file/folder structure so a renderer never re-derives them from scratch.
//! Trees are either held in memory (eager mode) or pulled level by level from a
//! data source (lazy mode).

pub mod concurrency;
pub mod config;
pub mod engine;
pub mod error;
pub mod expansion;
pub mod index;
pub mod logging;
pub mod selection;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod views;

pub use engine::{Activation, ContextMenuItem, EagerTreeState, LazyTreeState};
pub use error::{ApiError, TreeError};
pub use index::{DataSource, FetchParent, FnSource, FsDataSource, IndexedNode, Parent, TreeIndex};
pub use selection::{SelectionEvent, SelectionPolicy};
pub use tree::{Node, NodeKind, Tree};
pub use types::{NodeId, TreePath};
