//! Tree model: node types, path resolution, and filesystem ingestion.

pub mod node;
pub mod path;
pub mod walker;

pub use node::{validate_name, validate_nodes, Node, NodeKind, Tree};
pub use path::{ancestor_paths, child_path, path_of, resolve, segments_of, walk_folders};
pub use walker::{scan_directory, WalkerConfig};
