//! Eager mode: the whole tree is in memory and state is keyed by path.

use super::menu::{ContextMenu, ContextMenuItem};
use super::Activation;
use crate::config::TreeStateConfig;
use crate::error::TreeError;
use crate::expansion::PathExpansion;
use crate::selection::{SelectionController, SelectionEvent, SelectionPolicy};
use crate::tree::{resolve, Node, Tree};
use crate::views::{self, IconTheme, VisibleRow};
use tokio::sync::broadcast;
use tracing::debug;

pub struct EagerTreeState {
    tree: Tree,
    expansion: PathExpansion,
    selection: SelectionController,
    menu: ContextMenu,
    icons: IconTheme,
}

impl EagerTreeState {
    pub fn new(tree: Tree, policy: SelectionPolicy) -> Self {
        Self {
            tree,
            expansion: PathExpansion::new(),
            selection: SelectionController::new(policy),
            menu: ContextMenu::default(),
            icons: IconTheme::default(),
        }
    }

    pub fn from_config(tree: Tree, config: &TreeStateConfig) -> Self {
        let mut state = Self::new(tree, config.selection_policy());
        state.icons = config.icons.clone();
        state
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Swap in a new tree. Expansion and selection are kept as they are;
    /// entries for paths that no longer exist are inert.
    pub fn set_tree(&mut self, tree: Tree) {
        self.tree = tree;
        self.menu.close();
    }

    pub fn expansion(&self) -> &PathExpansion {
        &self.expansion
    }

    pub fn icons(&self) -> &IconTheme {
        &self.icons
    }

    pub fn set_icons(&mut self, icons: IconTheme) {
        self.icons = icons;
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expansion.is_expanded(&path.to_string())
    }

    pub fn is_collapsed(&self, path: &str) -> bool {
        !self.is_expanded(path)
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selection.is_selected(path)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.selected()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SelectionEvent> {
        self.selection.subscribe()
    }

    pub fn context_menu(&self) -> &ContextMenu {
        &self.menu
    }

    pub fn set_context_menu(&mut self, items: Vec<ContextMenuItem>) {
        self.menu.set_items(items);
    }

    /// Click on a node: select it, or toggle it when it is a folder that
    /// cannot be selected.
    pub fn on_node_activate(&mut self, path: &str, node: &Node) -> Activation {
        match self
            .selection
            .select(path, node.kind(), &mut self.expansion)
        {
            Some(event) => {
                self.menu.close();
                Activation::Selected(event)
            }
            None => Activation::Toggled {
                expanded: self.on_toggle_expand(path),
            },
        }
    }

    /// Returns the new expanded state.
    pub fn on_toggle_expand(&mut self, path: &str) -> bool {
        self.expansion.toggle(path.to_string())
    }

    /// Right-click on a node; returns whether the menu opened.
    pub fn on_context_menu(&mut self, path: &str, node: &Node) -> bool {
        self.menu.open_for(path, node)
    }

    pub fn on_context_action(&mut self, item: &ContextMenuItem, path: &str, node: &Node) {
        self.menu.activate(item, path, node);
    }

    /// Programmatically reveal and select the node at `path`.
    pub fn select_file(&mut self, path: &str) -> Result<Option<SelectionEvent>, TreeError> {
        let kind = resolve(self.tree.roots(), path)?.kind();
        Ok(self.selection.select(path, kind, &mut self.expansion))
    }

    pub fn expand_all(&mut self) {
        self.expansion.expand_all();
        debug!("Expanded all folders");
    }

    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all(self.tree.roots());
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        views::visible_rows(
            self.tree.roots(),
            &self.expansion,
            &self.selection,
            &self.icons,
        )
    }
}
