//! Lazy mode: children come from a data source on demand and state is keyed
//! by node identity.

use super::menu::{ContextMenu, ContextMenuItem};
use super::Activation;
use crate::config::TreeStateConfig;
use crate::error::TreeError;
use crate::expansion::NodeExpansion;
use crate::index::{DataSource, IndexedNode, Parent, TreeIndex};
use crate::selection::{SelectionController, SelectionEvent, SelectionPolicy};
use crate::tree::NodeKind;
use crate::types::NodeId;
use crate::views::{IconTheme, VisibleRow};
use futures::future::join_all;
use tokio::sync::broadcast;
use tracing::{debug, warn};

pub struct LazyTreeState<S> {
    index: TreeIndex<S>,
    expansion: NodeExpansion,
    selection: SelectionController,
    menu: ContextMenu,
    icons: IconTheme,
}

impl<S: DataSource> LazyTreeState<S> {
    pub fn new(source: S, policy: SelectionPolicy) -> Self {
        Self {
            index: TreeIndex::new(source),
            expansion: NodeExpansion::new(),
            selection: SelectionController::new(policy),
            menu: ContextMenu::default(),
            icons: IconTheme::default(),
        }
    }

    pub fn from_config(source: S, config: &TreeStateConfig) -> Self {
        let mut state = Self::new(source, config.selection_policy());
        state.icons = config.icons.clone();
        state
    }

    pub fn index(&self) -> &TreeIndex<S> {
        &self.index
    }

    pub fn expansion(&self) -> &NodeExpansion {
        &self.expansion
    }

    pub async fn children_of(&self, parent: Parent) -> Result<Vec<IndexedNode>, TreeError> {
        self.index.children_of(parent).await
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expansion.is_expanded(&id)
    }

    pub fn is_collapsed(&self, id: NodeId) -> bool {
        self.expansion.is_collapsed(&id)
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

    /// Returns the new expanded state.
    pub fn on_toggle_expand(&mut self, id: NodeId) -> bool {
        self.expansion.toggle(id)
    }

    pub fn on_node_activate(&mut self, id: NodeId) -> Result<Activation, TreeError> {
        let kind = self.kind_of(id)?;
        let path = self.index.path_of(id)?;
        match self.select_node(id, kind, &path)? {
            Some(event) => {
                self.menu.close();
                Ok(Activation::Selected(event))
            }
            None => Ok(Activation::Toggled {
                expanded: self.on_toggle_expand(id),
            }),
        }
    }

    pub fn on_context_menu(&mut self, id: NodeId) -> Result<bool, TreeError> {
        let node = self.index.node(id).ok_or(TreeError::DetachedNode(id))?;
        let path = self.index.path_of(id)?;
        Ok(self.menu.open_for(&path, &node))
    }

    pub fn on_context_action(&mut self, item: &ContextMenuItem, id: NodeId) -> Result<(), TreeError> {
        let node = self.index.node(id).ok_or(TreeError::DetachedNode(id))?;
        let path = self.index.path_of(id)?;
        self.menu.activate(item, &path, &node);
        Ok(())
    }

    /// Fetch levels down to `path`, then reveal and select it.
    pub async fn select_file(&mut self, path: &str) -> Result<Option<SelectionEvent>, TreeError> {
        let found = self.index.find_by_path(path).await?;
        self.select_node(found.id, found.node.kind(), path)
    }

    fn select_node(
        &mut self,
        id: NodeId,
        kind: NodeKind,
        path: &str,
    ) -> Result<Option<SelectionEvent>, TreeError> {
        let index = &self.index;
        let expansion = &mut self.expansion;
        self.selection
            .select_with(path, kind, |_| expansion.expand_ancestors_of(index, id))
    }

    fn kind_of(&self, id: NodeId) -> Result<NodeKind, TreeError> {
        self.index
            .node(id)
            .map(|n| n.kind())
            .ok_or(TreeError::DetachedNode(id))
    }

    /// Collapse everything. Unexpanded nodes are never fetched, so this is O(1).
    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all();
        debug!("Collapsed all lazy folders");
    }

    /// Forget the fetched tree, e.g. after the host swapped data sources.
    ///
    /// In-flight fetches are abandoned. The selected path is kept.
    pub fn reset(&mut self) {
        self.index.reset();
        self.expansion.collapse_all();
        self.menu.close();
    }

    /// Fetch the children of every expanded folder concurrently.
    ///
    /// Failures are logged and skipped so one unreadable folder does not block
    /// the rest; the number of folders warmed is returned.
    pub async fn prefetch_expanded(&self) -> usize {
        let parents: Vec<NodeId> = self.expansion.markers().copied().collect();
        let results = join_all(
            parents
                .iter()
                .map(|id| self.index.children_of(Parent::Node(*id))),
        )
        .await;
        let mut warmed = 0;
        for (id, result) in parents.iter().zip(results) {
            match result {
                Ok(_) => warmed += 1,
                Err(err) => warn!(node = %id, error = %err, "Prefetch failed"),
            }
        }
        warmed
    }

    /// Visible rows in display order, fetching expanded folders as needed.
    pub async fn visible_rows(&self) -> Result<Vec<VisibleRow>, TreeError> {
        let mut rows = Vec::new();
        let mut stack: Vec<(IndexedNode, usize)> = self
            .index
            .children_of(Parent::Root)
            .await?
            .into_iter()
            .rev()
            .map(|n| (n, 0))
            .collect();

        while let Some((item, depth)) = stack.pop() {
            let path = self.index.path_of(item.id)?;
            let expanded = item.node.is_folder() && self.is_expanded(item.id);
            rows.push(VisibleRow {
                id: Some(item.id),
                selected: self.selection.is_selected(&path),
                path,
                name: item.node.name().to_string(),
                kind: item.node.kind(),
                depth,
                expanded,
                icon: self.icons.icon_for(item.node.kind(), expanded).to_string(),
            });
            if expanded {
                let children = self.index.children_of(Parent::Node(item.id)).await?;
                stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
            }
        }
        Ok(rows)
    }
}
