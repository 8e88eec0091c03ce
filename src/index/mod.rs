//! Tree Index (lazy mode)
//!
//! Bridges a pull-based data source with identity and ancestor bookkeeping.
//! Nodes returned by the source are interned into an arena keyed by
//! `(parent, name)`, and a side-table maps each child to its parent. Nothing
//! holds a reference cycle: paths and ancestor chains are reconstructed by
//! walking the side-table.

pub mod fs;

use crate::concurrency::Epoch;
use crate::error::TreeError;
use crate::tree::{path_of, resolve, segments_of, validate_name, Node, Tree};
use crate::types::{NodeId, TreePath};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

pub use fs::FsDataSource;

/// Parent of a fetched node: the invisible root or a previously fetched folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    Root,
    Node(NodeId),
}

/// Parent handed to the data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchParent {
    Root,
    Folder {
        id: NodeId,
        name: String,
        path: TreePath,
    },
}

impl FetchParent {
    /// Path of the parent, `None` for the root
    pub fn path(&self) -> Option<&str> {
        match self {
            FetchParent::Root => None,
            FetchParent::Folder { path, .. } => Some(path),
        }
    }
}

/// External source of children
///
/// Must return immediate children only, in a stable order. Calling it twice
/// with the same parent should yield equivalent children, not necessarily the
/// same instances.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn children(&self, parent: &FetchParent) -> Result<Vec<Node>, TreeError>;
}

#[async_trait]
impl<S: DataSource + ?Sized> DataSource for Arc<S> {
    async fn children(&self, parent: &FetchParent) -> Result<Vec<Node>, TreeError> {
        (**self).children(parent).await
    }
}

/// Synchronous closure used as a data source
pub struct FnSource<F>(pub F);

#[async_trait]
impl<F> DataSource for FnSource<F>
where
    F: Fn(&FetchParent) -> Result<Vec<Node>, TreeError> + Send + Sync,
{
    async fn children(&self, parent: &FetchParent) -> Result<Vec<Node>, TreeError> {
        (self.0)(parent)
    }
}

/// An in-memory tree served level by level
#[async_trait]
impl DataSource for Tree {
    async fn children(&self, parent: &FetchParent) -> Result<Vec<Node>, TreeError> {
        let level = match parent.path() {
            None => self.roots(),
            Some(path) => resolve(self.roots(), path)?.children(),
        };
        Ok(level.iter().map(Node::shallow).collect())
    }
}

/// A materialized node and its identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedNode {
    pub id: NodeId,
    pub node: Node,
}

#[derive(Debug, Clone)]
struct Entry {
    node: Node,
    parent: Parent,
}

#[derive(Debug, Default)]
struct IndexState {
    entries: HashMap<NodeId, Entry>,
    by_name: HashMap<(Parent, String), NodeId>,
    children: HashMap<Parent, Vec<NodeId>>,
    /// Child lists dropped by `invalidate`, diffed against the next fetch
    stale: HashMap<Parent, Vec<NodeId>>,
}

impl IndexState {
    fn indexed(&self, ids: &[NodeId]) -> Vec<IndexedNode> {
        ids.iter()
            .filter_map(|id| {
                self.entries.get(id).map(|entry| IndexedNode {
                    id: *id,
                    node: entry.node.clone(),
                })
            })
            .collect()
    }

    /// Remove `id` and everything materialized below it; returns the count.
    fn detach(&mut self, id: NodeId) -> usize {
        let Some(entry) = self.entries.remove(&id) else {
            return 0;
        };
        self.by_name
            .remove(&(entry.parent, entry.node.name().to_string()));
        let below: Vec<NodeId> = self
            .children
            .remove(&Parent::Node(id))
            .into_iter()
            .chain(self.stale.remove(&Parent::Node(id)))
            .flatten()
            .collect();
        1 + below.into_iter().map(|child| self.detach(child)).sum::<usize>()
    }

    /// Names from the root down to `id`
    fn lineage(&self, id: NodeId) -> Result<Vec<&str>, TreeError> {
        let mut names = Vec::new();
        let mut current = id;
        loop {
            let entry = self
                .entries
                .get(&current)
                .ok_or(TreeError::DetachedNode(current))?;
            names.push(entry.node.name());
            match entry.parent {
                Parent::Root => break,
                Parent::Node(parent) => current = parent,
            }
        }
        names.reverse();
        Ok(names)
    }

    fn path_of(&self, id: NodeId) -> Result<TreePath, TreeError> {
        let names = self.lineage(id)?;
        let (name, ancestors) = names.split_last().ok_or(TreeError::DetachedNode(id))?;
        Ok(path_of(ancestors, name))
    }
}

/// Lazy index over a data source
pub struct TreeIndex<S> {
    source: S,
    state: RwLock<IndexState>,
    next_id: AtomicU64,
    epoch: Epoch,
}

impl<S: DataSource> TreeIndex<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: RwLock::new(IndexState::default()),
            next_id: AtomicU64::new(1),
            epoch: Epoch::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current cache epoch
    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    /// Immediate children of `parent`, fetching them on first use.
    ///
    /// The data source is invoked once per distinct parent per cache epoch.
    /// Files have no children and never reach the source. Every returned child
    /// has its parent link set to `parent`; same-named children of a re-fetched
    /// parent keep their identity.
    pub async fn children_of(&self, parent: Parent) -> Result<Vec<IndexedNode>, TreeError> {
        let (ticket, request) = {
            let state = self.state.read();
            if let Some(ids) = state.children.get(&parent) {
                debug!(parent = ?parent, count = ids.len(), "Children cache hit");
                return Ok(state.indexed(ids));
            }
            let request = match parent {
                Parent::Root => FetchParent::Root,
                Parent::Node(id) => {
                    let entry = state.entries.get(&id).ok_or(TreeError::DetachedNode(id))?;
                    if entry.node.is_file() {
                        return Ok(Vec::new());
                    }
                    FetchParent::Folder {
                        id,
                        name: entry.node.name().to_string(),
                        path: state.path_of(id)?,
                    }
                }
            };
            (self.epoch.ticket(), request)
        };

        let nodes = self.source.children(&request).await?;
        for node in &nodes {
            validate_name(node.name())?;
        }

        let mut state = self.state.write();
        if !ticket.is_current() {
            warn!(parent = ?request.path(), "Discarding children fetched before a reset");
            return Err(TreeError::Stale);
        }

        let mut ids = Vec::with_capacity(nodes.len());
        for node in nodes {
            ids.push(self.attach(&mut state, parent, node));
        }
        let vanished: Vec<NodeId> = state
            .stale
            .remove(&parent)
            .unwrap_or_default()
            .into_iter()
            .filter(|id| !ids.contains(id))
            .collect();
        let pruned: usize = vanished.into_iter().map(|id| state.detach(id)).sum();
        debug!(parent = ?request.path(), count = ids.len(), pruned, "Fetched children");
        let indexed = state.indexed(&ids);
        state.children.insert(parent, ids);
        Ok(indexed)
    }

    fn attach(&self, state: &mut IndexState, parent: Parent, node: Node) -> NodeId {
        let key = (parent, node.name().to_string());
        let node = node.shallow();
        if let Some(id) = state.by_name.get(&key).copied() {
            state.entries.insert(id, Entry { node, parent });
            return id;
        }
        let id = NodeId(self.next_id.fetch_add(1, Ordering::Relaxed));
        state.entries.insert(id, Entry { node, parent });
        state.by_name.insert(key, id);
        id
    }

    /// Children already materialized for `parent`, without fetching
    pub fn cached_children(&self, parent: Parent) -> Option<Vec<IndexedNode>> {
        let state = self.state.read();
        state.children.get(&parent).map(|ids| state.indexed(ids))
    }

    pub fn node(&self, id: NodeId) -> Option<Node> {
        self.state.read().entries.get(&id).map(|e| e.node.clone())
    }

    pub fn parent_of(&self, id: NodeId) -> Result<Parent, TreeError> {
        self.state
            .read()
            .entries
            .get(&id)
            .map(|e| e.parent)
            .ok_or(TreeError::DetachedNode(id))
    }

    /// Path of a fetched node, rebuilt from its parent links
    pub fn path_of(&self, id: NodeId) -> Result<TreePath, TreeError> {
        self.state.read().path_of(id)
    }

    /// Proper ancestors of `id`, nearest first
    pub fn ancestors_of(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let state = self.state.read();
        let mut ancestors = Vec::new();
        let mut current = state
            .entries
            .get(&id)
            .ok_or(TreeError::DetachedNode(id))?
            .parent;
        while let Parent::Node(parent) = current {
            let entry = state
                .entries
                .get(&parent)
                .ok_or(TreeError::DetachedNode(parent))?;
            ancestors.push(parent);
            current = entry.parent;
        }
        Ok(ancestors)
    }

    /// Descend segment by segment, fetching each level as needed.
    pub async fn find_by_path(&self, path: &str) -> Result<IndexedNode, TreeError> {
        let not_found = || TreeError::NotFound(path.to_string());
        if path.is_empty() {
            return Err(not_found());
        }

        let mut found: Option<IndexedNode> = None;
        for segment in segments_of(path) {
            let parent = match &found {
                None => Parent::Root,
                Some(current) if current.node.is_file() => return Err(not_found()),
                Some(current) => Parent::Node(current.id),
            };
            let children = self.children_of(parent).await?;
            found = Some(
                children
                    .into_iter()
                    .find(|child| child.node.name() == segment)
                    .ok_or_else(not_found)?,
            );
        }
        found.ok_or_else(not_found)
    }

    /// Drop the cached child list of one parent; the next fetch refreshes it.
    ///
    /// Children the refreshed listing no longer contains are detached along
    /// with their materialized subtrees.
    pub fn invalidate(&self, parent: Parent) {
        let mut state = self.state.write();
        if let Some(ids) = state.children.remove(&parent) {
            state.stale.entry(parent).or_default().extend(ids);
        }
    }

    /// Forget everything and start a new epoch.
    ///
    /// Fetches still in flight resolve to `TreeError::Stale`, and every
    /// previously issued `NodeId` becomes detached.
    pub fn reset(&self) {
        let mut state = self.state.write();
        *state = IndexState::default();
        let epoch = self.epoch.advance();
        debug!(epoch, "Reset tree index");
    }

    /// Number of materialized nodes
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
