//! Filesystem-backed data source: lists one directory per fetch.

use super::{DataSource, FetchParent};
use crate::config::ScanConfig;
use crate::error::TreeError;
use crate::tree::walker::sibling_order;
use crate::tree::{child_path, segments_of, Node};
use crate::types::TreePath;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Lazy source reading directories under `root` with `tokio::fs`
///
/// Entry names that are not valid UTF-8 are shown lossily; the real on-disk
/// location of such folders (and of everything below them) is remembered so
/// they can still be listed.
#[derive(Debug, Clone)]
pub struct FsDataSource {
    root: PathBuf,
    include_hidden: bool,
    follow_symlinks: bool,
    max_depth: Option<usize>,
    real_paths: Arc<RwLock<HashMap<TreePath, PathBuf>>>,
}

impl FsDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_hidden: false,
            follow_symlinks: false,
            max_depth: None,
            real_paths: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Source honoring the same scan settings as the eager directory walker
    pub fn from_scan(root: impl Into<PathBuf>, scan: &ScanConfig) -> Self {
        let mut source = Self::new(root).with_hidden(scan.include_hidden);
        source.follow_symlinks = scan.follow_symlinks;
        source.max_depth = scan.max_depth;
        source
    }

    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_for(&self, parent: &FetchParent) -> PathBuf {
        match parent.path() {
            None => self.root.clone(),
            Some(path) => match self.real_paths.read().get(path) {
                Some(real) => real.clone(),
                None => segments_of(path)
                    .into_iter()
                    .fold(self.root.clone(), |dir, s| dir.join(s)),
            },
        }
    }

    /// Children of a folder at `depth` segments lie beyond `max_depth`.
    fn beyond_depth(&self, parent: &FetchParent) -> bool {
        match (self.max_depth, parent.path()) {
            (Some(max), Some(path)) => segments_of(path).len() >= max,
            (Some(max), None) => max == 0,
            (None, _) => false,
        }
    }
}

#[async_trait]
impl DataSource for FsDataSource {
    async fn children(&self, parent: &FetchParent) -> Result<Vec<Node>, TreeError> {
        if self.beyond_depth(parent) {
            return Ok(Vec::new());
        }
        let dir = self.dir_for(parent);
        let remapped = parent
            .path()
            .map_or(false, |p| self.real_paths.read().contains_key(p));
        let io_err = |e: std::io::Error| TreeError::Source(format!("{}: {}", dir.display(), e));

        let mut entries = tokio::fs::read_dir(&dir).await.map_err(io_err)?;
        let mut listed: Vec<(bool, String)> = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let os_name = entry.file_name();
            let (name, lossy) = match os_name.to_str() {
                Some(name) => (name.to_string(), false),
                None => (os_name.to_string_lossy().into_owned(), true),
            };
            if !self.include_hidden && name.starts_with('.') {
                continue;
            }
            let file_type = entry.file_type().await.map_err(io_err)?;
            let is_dir = if file_type.is_symlink() && self.follow_symlinks {
                match tokio::fs::metadata(entry.path()).await {
                    Ok(target) => target.is_dir(),
                    Err(err) => {
                        warn!(path = %entry.path().display(), error = %err, "Dangling symlink");
                        false
                    }
                }
            } else {
                file_type.is_dir()
            };
            if is_dir && (lossy || remapped) {
                if lossy {
                    warn!(path = %entry.path().display(), "Folder name is not valid UTF-8");
                }
                self.real_paths
                    .write()
                    .insert(child_path(parent.path(), &name), entry.path());
            }
            listed.push((is_dir, name));
        }
        listed.sort_by(|(a_dir, a), (b_dir, b)| sibling_order(*a_dir, a, *b_dir, b));

        debug!(dir = %dir.display(), count = listed.len(), "Listed directory");
        Ok(listed
            .into_iter()
            .map(|(is_dir, name)| {
                if is_dir {
                    Node::folder(name, Vec::new())
                } else {
                    Node::file(name)
                }
            })
            .collect())
    }
}
