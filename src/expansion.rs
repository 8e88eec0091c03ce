//! Expansion Store
//!
//! Owns the set of markers recording which folders deviate from the default
//! expansion of their mode. Eager trees start fully expanded and record
//! collapsed paths; lazy trees start fully collapsed and record expanded node
//! identities. Entries are never resynced with the node tree, so markers for
//! nodes that no longer exist are harmless no-ops.

use crate::error::TreeError;
use crate::index::{DataSource, TreeIndex};
use crate::tree::{ancestor_paths, walk_folders, Node};
use crate::types::{NodeId, TreePath};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use tracing::debug;

/// Which state the marker set records
pub trait Polarity {
    /// True when a marker means "collapsed", false when it means "expanded"
    const TRACKS_COLLAPSED: bool;
}

/// Markers are collapsed folders; everything else is expanded (eager mode)
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackCollapsed;

/// Markers are expanded folders; everything else is collapsed (lazy mode)
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackExpanded;

impl Polarity for TrackCollapsed {
    const TRACKS_COLLAPSED: bool = true;
}

impl Polarity for TrackExpanded {
    const TRACKS_COLLAPSED: bool = false;
}

/// Marker set with a fixed polarity
#[derive(Debug, Clone)]
pub struct ExpansionStore<M, P> {
    markers: HashSet<M>,
    _polarity: PhantomData<P>,
}

/// Eager mode: collapsed paths
pub type PathExpansion = ExpansionStore<TreePath, TrackCollapsed>;

/// Lazy mode: expanded node identities
pub type NodeExpansion = ExpansionStore<NodeId, TrackExpanded>;

impl<M, P> Default for ExpansionStore<M, P> {
    fn default() -> Self {
        Self {
            markers: HashSet::new(),
            _polarity: PhantomData,
        }
    }
}

impl<M, P> PartialEq for ExpansionStore<M, P>
where
    M: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.markers == other.markers
    }
}

impl<M, P> ExpansionStore<M, P>
where
    M: Eq + Hash + Clone + Debug,
    P: Polarity,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, marker: &M) -> bool {
        self.markers.contains(marker) != P::TRACKS_COLLAPSED
    }

    pub fn is_collapsed(&self, marker: &M) -> bool {
        !self.is_expanded(marker)
    }

    /// Flip one marker. Descendants and ancestors are unaffected.
    ///
    /// Returns the new expanded state.
    pub fn toggle(&mut self, marker: M) -> bool {
        if !self.markers.remove(&marker) {
            self.markers.insert(marker.clone());
        }
        let expanded = self.is_expanded(&marker);
        debug!(marker = ?marker, expanded, "Toggled expansion");
        expanded
    }

    pub fn expand(&mut self, marker: M) {
        self.set(marker, true);
    }

    pub fn collapse(&mut self, marker: M) {
        self.set(marker, false);
    }

    fn set(&mut self, marker: M, expanded: bool) {
        if expanded == P::TRACKS_COLLAPSED {
            self.markers.remove(&marker);
        } else {
            self.markers.insert(marker);
        }
    }

    /// Raw markers (collapsed paths or expanded ids depending on polarity)
    pub fn markers(&self) -> impl Iterator<Item = &M> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl PathExpansion {
    /// Expand every folder. O(1).
    pub fn expand_all(&mut self) {
        self.markers.clear();
    }

    /// Collapse every folder of `roots`. O(total nodes).
    pub fn collapse_all(&mut self, roots: &[Node]) {
        walk_folders(roots, &mut |path, _| {
            self.markers.insert(path.to_string());
        });
        debug!(collapsed = self.markers.len(), "Collapsed all folders");
    }

    /// Expand every proper ancestor of `path` so it becomes visible.
    ///
    /// Idempotent; the target itself is left as it was.
    pub fn expand_ancestors_of(&mut self, path: &str) {
        for ancestor in ancestor_paths(path) {
            self.markers.remove(&ancestor);
        }
    }
}

impl NodeExpansion {
    /// Collapse everything. O(1): unexpanded nodes are never fetched.
    pub fn collapse_all(&mut self) {
        self.markers.clear();
    }

    /// Expand every ancestor of `node` by walking its parent links.
    ///
    /// On `DetachedNode` the store is left unchanged.
    pub fn expand_ancestors_of<S: DataSource>(
        &mut self,
        index: &TreeIndex<S>,
        node: NodeId,
    ) -> Result<(), TreeError> {
        let ancestors = index.ancestors_of(node)?;
        self.markers.extend(ancestors);
        Ok(())
    }
}
