//! Tree Views
//!
//! Read-side projection consumed by a renderer: the flattened list of visible
//! rows and icon lookup. Icons are resolved by string key with a fixed
//! fallback glyph; the engine has no other opinion about presentation.

use crate::expansion::PathExpansion;
use crate::selection::SelectionController;
use crate::tree::{child_path, Node, NodeKind};
use crate::types::{NodeId, TreePath};
use serde::{Deserialize, Serialize};

pub const FOLDER_CLOSED_KEY: &str = "folder-icon-closed";
pub const FOLDER_OPEN_KEY: &str = "folder-icon-open";
pub const FILE_KEY: &str = "file-icon";

/// Icon glyphs, overridable from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconTheme {
    #[serde(default = "default_folder_closed")]
    pub folder_closed: String,
    #[serde(default = "default_folder_open")]
    pub folder_open: String,
    #[serde(default = "default_file")]
    pub file: String,
    #[serde(default = "default_file")]
    pub fallback: String,
}

fn default_folder_closed() -> String {
    "📁".to_string()
}

fn default_folder_open() -> String {
    "📂".to_string()
}

fn default_file() -> String {
    "📄".to_string()
}

impl Default for IconTheme {
    fn default() -> Self {
        Self {
            folder_closed: default_folder_closed(),
            folder_open: default_folder_open(),
            file: default_file(),
            fallback: default_file(),
        }
    }
}

impl IconTheme {
    /// Look up a glyph by key; unknown keys and blank overrides use the fallback.
    pub fn get(&self, key: &str) -> &str {
        let glyph = match key {
            FOLDER_CLOSED_KEY => self.folder_closed.trim(),
            FOLDER_OPEN_KEY => self.folder_open.trim(),
            FILE_KEY => self.file.trim(),
            _ => "",
        };
        if glyph.is_empty() {
            self.fallback.as_str()
        } else {
            glyph
        }
    }

    pub fn icon_for(&self, kind: NodeKind, expanded: bool) -> &str {
        self.get(icon_key(kind, expanded))
    }
}

pub fn icon_key(kind: NodeKind, expanded: bool) -> &'static str {
    match (kind, expanded) {
        (NodeKind::File, _) => FILE_KEY,
        (NodeKind::Folder, true) => FOLDER_OPEN_KEY,
        (NodeKind::Folder, false) => FOLDER_CLOSED_KEY,
    }
}

/// One visible line of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleRow {
    /// Lazy-mode identity; eager rows have none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    pub path: TreePath,
    pub name: String,
    pub kind: NodeKind,
    pub depth: usize,
    pub expanded: bool,
    pub selected: bool,
    pub icon: String,
}

/// Flatten the visible part of an eager tree in display order.
pub fn visible_rows(
    roots: &[Node],
    expansion: &PathExpansion,
    selection: &SelectionController,
    icons: &IconTheme,
) -> Vec<VisibleRow> {
    fn walk(
        nodes: &[Node],
        parent: Option<&str>,
        depth: usize,
        ctx: (&PathExpansion, &SelectionController, &IconTheme),
        rows: &mut Vec<VisibleRow>,
    ) {
        let (expansion, selection, icons) = ctx;
        for node in nodes {
            let path = child_path(parent, node.name());
            let expanded = node.is_folder() && expansion.is_expanded(&path);
            rows.push(VisibleRow {
                id: None,
                path: path.clone(),
                name: node.name().to_string(),
                kind: node.kind(),
                depth,
                expanded,
                selected: selection.is_selected(&path),
                icon: icons.icon_for(node.kind(), expanded).to_string(),
            });
            if expanded {
                walk(node.children(), Some(&path), depth + 1, ctx, rows);
            }
        }
    }

    let mut rows = Vec::new();
    walk(roots, None, 0, (expansion, selection, icons), &mut rows);
    rows
}

/// Plain-text rendering of rows, one per line, selection marked with `>`.
pub fn render_text(rows: &[VisibleRow]) -> String {
    render_text_styled(rows, str::to_string)
}

/// Like [`render_text`], with the selected row's `icon name` label passed
/// through `style` (e.g. terminal highlighting).
pub fn render_text_styled<F>(rows: &[VisibleRow], style: F) -> String
where
    F: Fn(&str) -> String,
{
    rows.iter()
        .map(|row| {
            let label = format!("{} {}", row.icon, row.name);
            let indent = "  ".repeat(row.depth);
            if row.selected {
                format!("> {}{}", indent, style(&label))
            } else {
                format!("  {}{}", indent, label)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots() -> Vec<Node> {
        vec![
            Node::folder("src", vec![Node::file("a.ts")]),
            Node::file("README.md"),
        ]
    }

    #[test]
    fn test_icon_lookup_falls_back() {
        let mut icons = IconTheme::default();
        assert_eq!(icons.get(FOLDER_OPEN_KEY), "📂");
        assert_eq!(icons.get("unknown"), "📄");
        icons.folder_closed = "  ".to_string();
        assert_eq!(icons.icon_for(NodeKind::Folder, false), "📄");
    }

    #[test]
    fn test_rows_follow_expansion() {
        let roots = roots();
        let mut expansion = PathExpansion::new();
        let selection = SelectionController::default();
        let icons = IconTheme::default();

        let rows = visible_rows(&roots, &expansion, &selection, &icons);
        let paths: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["src", "src/a.ts", "README.md"]);
        assert_eq!(rows[1].depth, 1);

        expansion.toggle("src".to_string());
        let rows = visible_rows(&roots, &expansion, &selection, &icons);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].icon, "📁");
    }

    #[test]
    fn test_render_marks_selection() {
        let roots = roots();
        let mut expansion = PathExpansion::new();
        let mut selection = SelectionController::default();
        selection.select("src/a.ts", NodeKind::File, &mut expansion);

        let rows = visible_rows(&roots, &expansion, &selection, &IconTheme::default());
        let text = render_text(&rows);
        assert!(text.contains(">   📄 a.ts"));
        assert!(text.starts_with("  📂 src"));
    }
}
