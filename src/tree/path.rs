//! Path resolution
//!
//! Pure functions mapping between a node's position in the hierarchy and its
//! slash-delimited path. Names containing `/` cannot be represented; no escaping
//! is supported.

use crate::error::TreeError;
use crate::tree::node::Node;
use crate::types::{TreePath, SEPARATOR};

/// Join an ancestor chain and a node name into a path.
///
/// An empty ancestor chain yields the bare node name.
pub fn path_of<S: AsRef<str>>(ancestors: &[S], name: &str) -> TreePath {
    let mut path = String::new();
    for ancestor in ancestors {
        path.push_str(ancestor.as_ref());
        path.push(SEPARATOR);
    }
    path.push_str(name);
    path
}

/// Append a child name to a parent path (`None` for the root level).
pub fn child_path(parent: Option<&str>, name: &str) -> TreePath {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{}{}{}", parent, SEPARATOR, name),
        _ => name.to_string(),
    }
}

/// Split a path into its segments.
pub fn segments_of(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).collect()
}

/// Every proper-ancestor path of `path`, shallowest first.
///
/// `a/b/c.ts` yields `["a", "a/b"]`.
pub fn ancestor_paths(path: &str) -> Vec<TreePath> {
    let segments = segments_of(path);
    let mut ancestors = Vec::with_capacity(segments.len().saturating_sub(1));
    let mut current = String::new();
    for segment in &segments[..segments.len().saturating_sub(1)] {
        if !current.is_empty() {
            current.push(SEPARATOR);
        }
        current.push_str(segment);
        ancestors.push(current.clone());
    }
    ancestors
}

/// Resolve a path against a root sequence.
///
/// Fails with `NotFound` when a segment has no matching child or when a
/// non-terminal segment names a file.
pub fn resolve<'a>(roots: &'a [Node], path: &str) -> Result<&'a Node, TreeError> {
    let not_found = || TreeError::NotFound(path.to_string());
    if path.is_empty() {
        return Err(not_found());
    }

    let mut level = roots;
    let mut found: Option<&Node> = None;
    for segment in segments_of(path) {
        if let Some(parent) = found {
            if parent.is_file() {
                return Err(not_found());
            }
            level = parent.children();
        }
        let node = level
            .iter()
            .find(|n| n.name() == segment)
            .ok_or_else(not_found)?;
        found = Some(node);
    }
    found.ok_or_else(not_found)
}

/// Visit every folder with its path, depth-first in sibling order.
pub fn walk_folders<'a, F>(roots: &'a [Node], visit: &mut F)
where
    F: FnMut(&str, &'a Node),
{
    fn walk<'a, F: FnMut(&str, &'a Node)>(nodes: &'a [Node], parent: Option<&str>, visit: &mut F) {
        for node in nodes {
            if let Node::Folder { name, children } = node {
                let path = child_path(parent, name);
                visit(&path, node);
                walk(children, Some(&path), visit);
            }
        }
    }
    walk(roots, None, visit);
}
