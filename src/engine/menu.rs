//! Context menu items and transient open state.
//!
//! The engine holds no opinion on menu contents, only on which callback fires
//! with which arguments.

use crate::tree::Node;
use crate::types::TreePath;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub type MenuCallback = Arc<dyn Fn(&str, &Node) + Send + Sync>;

/// Menu entry supplied by the host
#[derive(Clone)]
pub struct ContextMenuItem {
    pub title: String,
    callback: MenuCallback,
}

impl ContextMenuItem {
    pub fn new<F>(title: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&str, &Node) + Send + Sync + 'static,
    {
        Self {
            title: title.into(),
            callback: Arc::new(callback),
        }
    }

    pub fn invoke(&self, path: &str, node: &Node) {
        (self.callback)(path, node)
    }
}

impl fmt::Debug for ContextMenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextMenuItem")
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Node the menu is currently open for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTarget {
    pub path: TreePath,
    pub node: Node,
}

#[derive(Debug, Default)]
pub struct ContextMenu {
    items: Vec<ContextMenuItem>,
    open: Option<MenuTarget>,
}

impl ContextMenu {
    pub fn new(items: Vec<ContextMenuItem>) -> Self {
        Self { items, open: None }
    }

    pub fn items(&self) -> &[ContextMenuItem] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<ContextMenuItem>) {
        self.items = items;
        self.open = None;
    }

    pub fn open_target(&self) -> Option<&MenuTarget> {
        self.open.as_ref()
    }

    /// Open the menu for a node. Only files open it, and only when items exist.
    pub fn open_for(&mut self, path: &str, node: &Node) -> bool {
        if !node.is_file() || self.items.is_empty() {
            return false;
        }
        self.open = Some(MenuTarget {
            path: path.to_string(),
            node: node.clone(),
        });
        true
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    /// Close the menu, then fire `item` with `(path, node)`.
    pub fn activate(&mut self, item: &ContextMenuItem, path: &str, node: &Node) {
        self.close();
        debug!(title = %item.title, path, "Context action");
        item.invoke(path, node);
    }
}
