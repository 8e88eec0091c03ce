use std::collections::BTreeMap;

use proptest::prelude::*;
use treestate::expansion::PathExpansion;
use treestate::tree::{ancestor_paths, path_of, resolve, segments_of};
use treestate::{Node, NodeKind};

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.-]{0,7}"
}

/// Sibling names are unique; the later duplicate is dropped.
fn unique(nodes: Vec<Node>) -> Vec<Node> {
    let mut seen = BTreeMap::new();
    for node in nodes {
        seen.entry(node.name().to_string()).or_insert(node);
    }
    seen.into_values().collect()
}

fn forest() -> impl Strategy<Value = Vec<Node>> {
    let leaf = name().prop_map(|name| Node::file(name));
    let node = leaf.prop_recursive(4, 48, 6, |inner| {
        (name(), prop::collection::vec(inner, 0..6))
            .prop_map(|(name, children)| Node::folder(name, unique(children)))
    });
    prop::collection::vec(node, 0..6).prop_map(unique)
}

fn all_paths(nodes: &[Node], parent: &[String], out: &mut Vec<(String, NodeKind)>) {
    for node in nodes {
        out.push((path_of(parent, node.name()), node.kind()));
        let mut lineage = parent.to_vec();
        lineage.push(node.name().to_string());
        all_paths(node.children(), &lineage, out);
    }
}

proptest! {
    #[test]
    fn every_path_resolves_to_its_node(roots in forest()) {
        let mut paths = Vec::new();
        all_paths(&roots, &[], &mut paths);
        for (path, kind) in paths {
            let node = resolve(&roots, &path).unwrap();
            prop_assert_eq!(node.kind(), kind);
            prop_assert_eq!(Some(node.name()), segments_of(&path).last().copied());
        }
    }

    #[test]
    fn segments_invert_path_of(
        ancestors in prop::collection::vec(name(), 0..5),
        leaf in name(),
    ) {
        let path = path_of(&ancestors, &leaf);
        let mut expected: Vec<&str> = ancestors.iter().map(String::as_str).collect();
        expected.push(&leaf);
        prop_assert_eq!(segments_of(&path), expected);
        prop_assert_eq!(ancestor_paths(&path).len(), ancestors.len());
    }

    #[test]
    fn expand_ancestors_is_idempotent(roots in forest(), pick in any::<prop::sample::Index>()) {
        let mut paths = Vec::new();
        all_paths(&roots, &[], &mut paths);
        prop_assume!(!paths.is_empty());
        let (path, _) = &paths[pick.index(paths.len())];

        let mut expansion = PathExpansion::new();
        expansion.collapse_all(&roots);
        expansion.expand_ancestors_of(path);
        let once = expansion.clone();
        expansion.expand_ancestors_of(path);
        prop_assert_eq!(&expansion, &once);
        for ancestor in ancestor_paths(path) {
            prop_assert!(expansion.is_expanded(&ancestor));
        }
    }

    #[test]
    fn collapse_then_expand_all_matches_default(roots in forest()) {
        let mut expansion = PathExpansion::new();
        expansion.collapse_all(&roots);
        expansion.expand_all();
        prop_assert_eq!(expansion, PathExpansion::new());
    }

    #[test]
    fn expand_all_then_collapse_all_matches_collapse_all(
        roots in forest(),
        toggled in prop::collection::vec(name(), 0..4),
    ) {
        let mut direct = PathExpansion::new();
        direct.collapse_all(&roots);

        let mut cycled = PathExpansion::new();
        for path in toggled {
            cycled.toggle(path);
        }
        cycled.expand_all();
        cycled.collapse_all(&roots);
        prop_assert_eq!(cycled, direct);
    }
}
