//! Tree State Engine
//!
//! Composes path resolution, expansion, the lazy index and selection into the
//! contract consumed by a renderer. Two modes share one shape:
//! [`EagerTreeState`] over an in-memory tree and [`LazyTreeState`] over a data
//! source. Every operation either completes or fails with a [`TreeError`]
//! without leaving partial state behind.
//!
//! [`TreeError`]: crate::error::TreeError

pub mod eager;
pub mod lazy;
pub mod menu;

pub use eager::EagerTreeState;
pub use lazy::LazyTreeState;
pub use menu::{ContextMenu, ContextMenuItem, MenuTarget};

use crate::selection::SelectionEvent;

/// Outcome of activating (clicking) a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The node became the selection
    Selected(SelectionEvent),
    /// The node is a folder that cannot be selected; its expansion flipped
    Toggled { expanded: bool },
}
