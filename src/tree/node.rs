//! Tree node types and validated ingestion

use crate::error::TreeError;
use crate::types::SEPARATOR;
use serde::{Deserialize, Serialize};

/// Folder or file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::File => "file",
        }
    }
}

/// Tree node
///
/// Serialized with a `type` tag, so `{"name": "a.ts", "type": "file"}` and
/// `{"name": "src", "type": "folder", "children": [...]}` are both accepted.
/// A folder returned by a lazy data source usually carries no children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Folder {
        name: String,
        #[serde(default)]
        children: Vec<Node>,
    },
    File {
        name: String,
    },
}

impl Node {
    pub fn folder(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Folder {
            name: name.into(),
            children,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Node::File { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Folder { name, .. } | Node::File { name } => name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Folder { .. } => NodeKind::Folder,
            Node::File { .. } => NodeKind::File,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File { .. })
    }

    /// Children of a folder; files have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Folder { children, .. } => children,
            Node::File { .. } => &[],
        }
    }

    /// Copy of this node without its subtree.
    pub fn shallow(&self) -> Node {
        match self {
            Node::Folder { name, .. } => Node::folder(name.clone(), Vec::new()),
            Node::File { name } => Node::file(name.clone()),
        }
    }
}

/// Reject names the path format cannot represent.
pub fn validate_name(name: &str) -> Result<(), TreeError> {
    if name.is_empty() || name.contains(SEPARATOR) {
        return Err(TreeError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Validate every name in a node sequence, recursively.
pub fn validate_nodes(nodes: &[Node]) -> Result<(), TreeError> {
    for node in nodes {
        validate_name(node.name())?;
        validate_nodes(node.children())?;
    }
    Ok(())
}

/// Root sequence of an eager tree.
///
/// Construction validates names. Sibling names are expected to be unique; with
/// duplicates, path resolution is undefined (in practice the first match wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tree {
    roots: Vec<Node>,
}

impl Tree {
    pub fn new(roots: Vec<Node>) -> Result<Self, TreeError> {
        validate_nodes(&roots)?;
        Ok(Tree { roots })
    }

    pub fn empty() -> Self {
        Tree::default()
    }

    /// Parse a JSON array of nodes.
    pub fn from_json(json: &str) -> Result<Self, crate::error::ApiError> {
        let roots: Vec<Node> = serde_json::from_str(json)?;
        Ok(Tree::new(roots)?)
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Total node count (folders and files).
    pub fn len(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes.iter().map(|n| 1 + count(n.children())).sum()
        }
        count(&self.roots)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let roots = Vec::<Node>::deserialize(deserializer)?;
        Tree::new(roots).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_tagged_json() {
        let tree = Tree::from_json(
            r#"[{"name":"src","type":"folder","children":[{"name":"a.ts","type":"file"}]}]"#,
        )
        .unwrap();
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.roots()[0].kind(), NodeKind::Folder);
        assert_eq!(tree.roots()[0].children()[0].name(), "a.ts");
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_folder_children_default_to_empty() {
        let node: Node = serde_json::from_str(r#"{"name":"dir","type":"folder"}"#).unwrap();
        assert_eq!(node, Node::folder("dir", vec![]));
    }

    #[test]
    fn test_rejects_separator_in_nested_name() {
        let err = Tree::new(vec![Node::folder("src", vec![Node::file("a/b.ts")])]).unwrap_err();
        assert_eq!(err, TreeError::InvalidName("a/b.ts".to_string()));
    }

    #[test]
    fn test_rejects_empty_name() {
        assert!(validate_name("").is_err());
        assert!(Tree::from_json(r#"[{"name":"","type":"file"}]"#).is_err());
    }

    #[test]
    fn test_shallow_drops_subtree() {
        let node = Node::folder("a", vec![Node::file("b")]);
        assert!(node.shallow().children().is_empty());
        assert_eq!(Node::file("x").children().len(), 0);
    }
}
