//! Filesystem walker: builds an eager tree from a real directory

use crate::error::ApiError;
use crate::tree::node::{Node, Tree};
use std::cmp::Ordering;
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Maximum depth below the root (None = unbounded)
    pub max_depth: Option<usize>,
    /// Include dot-files and dot-directories
    pub include_hidden: bool,
    pub follow_symlinks: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_hidden: false,
            follow_symlinks: false,
        }
    }
}

/// Sibling order used by every filesystem-backed source: folders first, then by name.
pub(crate) fn sibling_order(a_dir: bool, a_name: &str, b_dir: bool, b_name: &str) -> Ordering {
    b_dir.cmp(&a_dir).then_with(|| a_name.cmp(b_name))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Scan `root` into a tree whose roots are the directory's entries.
pub fn scan_directory(root: &Path, config: &WalkerConfig) -> Result<Tree, ApiError> {
    let root = dunce::canonicalize(root)?;
    let mut walker = WalkDir::new(&root)
        .min_depth(1)
        .follow_links(config.follow_symlinks)
        .sort_by(|a, b| {
            sibling_order(
                a.file_type().is_dir(),
                &a.file_name().to_string_lossy(),
                b.file_type().is_dir(),
                &b.file_name().to_string_lossy(),
            )
        });
    if let Some(depth) = config.max_depth {
        walker = walker.max_depth(depth);
    }

    let include_hidden = config.include_hidden;
    let mut roots = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| include_hidden || !is_hidden(e))
    {
        let entry = entry.map_err(|e| ApiError::Io(e.into()))?;
        let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        insert(&mut roots, &segments, entry.file_type().is_dir());
    }

    let tree = Tree::new(roots)?;
    debug!(root = %root.display(), nodes = tree.len(), "Scanned directory");
    Ok(tree)
}

// Parents are always yielded before their children, so the folder for every
// intermediate segment already exists.
fn insert(level: &mut Vec<Node>, segments: &[String], is_dir: bool) {
    let Some((name, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        level.push(if is_dir {
            Node::folder(name.clone(), Vec::new())
        } else {
            Node::file(name.clone())
        });
        return;
    }
    for node in level.iter_mut() {
        if let Node::Folder { name: folder, children } = node {
            if folder == name {
                insert(children, rest, is_dir);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scans_folders_first_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/app")).unwrap();
        fs::write(dir.path().join("src/app/main.ts"), "").unwrap();
        fs::write(dir.path().join("src/b.ts"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();

        let tree = scan_directory(dir.path(), &WalkerConfig::default()).unwrap();
        let names: Vec<&str> = tree.roots().iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["src", "README.md"]);

        let src = &tree.roots()[0];
        let children: Vec<&str> = src.children().iter().map(|n| n.name()).collect();
        assert_eq!(children, vec!["app", "b.ts"]);
        assert_eq!(src.children()[0].children()[0].name(), "main.ts");
    }

    #[test]
    fn test_respects_depth_and_hidden() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/c.txt"), "").unwrap();
        fs::write(dir.path().join(".env"), "").unwrap();

        let config = WalkerConfig {
            max_depth: Some(1),
            include_hidden: true,
            ..WalkerConfig::default()
        };
        let tree = scan_directory(dir.path(), &config).unwrap();
        assert_eq!(tree.len(), 2);
        assert!(tree.roots()[0].children().is_empty());
    }
}
