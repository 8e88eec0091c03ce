use std::sync::Arc;

use parking_lot::Mutex;
use treestate::engine::{Activation, ContextMenuItem, EagerTreeState};
use treestate::{Node, NodeKind, SelectionPolicy, Tree, TreeError};

fn project() -> Tree {
    Tree::from_json(
        r#"[
            {"name": "src", "type": "folder", "children": [
                {"name": "app", "type": "folder", "children": [
                    {"name": "main.ts", "type": "file"}
                ]},
                {"name": "util.ts", "type": "file"}
            ]},
            {"name": "docs", "type": "folder", "children": []},
            {"name": "README.md", "type": "file"}
        ]"#,
    )
    .unwrap()
}

#[test]
fn select_file_expands_parent() {
    let tree = Tree::new(vec![Node::folder("a", vec![Node::file("b.ts")])]).unwrap();
    let mut state = EagerTreeState::new(tree, SelectionPolicy::default());
    state.select_file("a/b.ts").unwrap();
    assert_eq!(state.selected(), Some("a/b.ts"));
    assert!(!state.is_collapsed("a"));
}

#[test]
fn folder_click_only_toggles_when_not_selectable() {
    let tree = Tree::from_json(
        r#"[{"name":"src","type":"folder","children":[{"name":"a.ts","type":"file"}]}]"#,
    )
    .unwrap();
    let mut state = EagerTreeState::new(tree, SelectionPolicy::default());
    let mut events = state.subscribe();
    let folder = state.tree().roots()[0].clone();

    assert_eq!(
        state.on_node_activate("src", &folder),
        Activation::Toggled { expanded: false }
    );
    assert_eq!(
        state.on_node_activate("src", &folder),
        Activation::Toggled { expanded: true }
    );
    assert_eq!(state.selected(), None);
    assert!(events.try_recv().is_err());
}

#[test]
fn collapse_all_then_select_reveals_every_ancestor() {
    let mut state = EagerTreeState::new(project(), SelectionPolicy::default());
    state.collapse_all();
    assert!(state.is_collapsed("docs"));

    state.select_file("src/app/main.ts").unwrap();
    assert!(state.is_expanded("src"));
    assert!(state.is_expanded("src/app"));
    assert!(state.is_collapsed("docs"));
    assert!(state.is_selected("src/app/main.ts"));

    let visible: Vec<String> = state.visible_rows().into_iter().map(|r| r.path).collect();
    assert_eq!(
        visible,
        vec!["src", "src/app", "src/app/main.ts", "src/util.ts", "docs", "README.md"]
    );
}

#[test]
fn selection_emits_notification_with_node_type() {
    let mut state = EagerTreeState::new(project(), SelectionPolicy::default());
    let mut events = state.subscribe();
    let file = Node::file("util.ts");

    let activation = state.on_node_activate("src/util.ts", &file);
    let received = events.try_recv().unwrap();
    assert_eq!(activation, Activation::Selected(received.clone()));
    assert_eq!(received.path, "src/util.ts");
    assert!(received.is_file);
    assert_eq!(received.node_type, NodeKind::File);
}

#[test]
fn programmatic_selection_respects_folder_policy() {
    let mut state = EagerTreeState::new(project(), SelectionPolicy::default());
    state.select_file("README.md").unwrap();
    assert_eq!(state.select_file("src/app").unwrap(), None);
    assert_eq!(state.selected(), Some("README.md"));

    let mut selectable = EagerTreeState::new(
        project(),
        SelectionPolicy {
            folder_selectable: true,
        },
    );
    assert!(selectable.select_file("src/app").unwrap().is_some());
    assert_eq!(selectable.selected(), Some("src/app"));
}

#[test]
fn not_found_leaves_state_untouched() {
    let mut state = EagerTreeState::new(project(), SelectionPolicy::default());
    state.collapse_all();
    let before = state.expansion().clone();

    assert_eq!(
        state.select_file("src/app/missing.ts"),
        Err(TreeError::NotFound("src/app/missing.ts".to_string()))
    );
    assert_eq!(state.expansion(), &before);
    assert_eq!(state.selected(), None);
}

#[test]
fn context_action_fires_callback_and_closes_menu() {
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    let item = ContextMenuItem::new("Reveal", move |path, node| {
        *sink.lock() = Some((path.to_string(), node.kind()));
    });

    let mut state = EagerTreeState::new(project(), SelectionPolicy::default());
    state.set_context_menu(vec![item.clone()]);
    let file = Node::file("main.ts");
    assert!(!state.on_context_menu("src", &Node::folder("src", vec![])));
    assert!(state.on_context_menu("src/app/main.ts", &file));

    state.on_context_action(&item, "src/app/main.ts", &file);
    assert!(state.context_menu().open_target().is_none());
    assert_eq!(
        *seen.lock(),
        Some(("src/app/main.ts".to_string(), NodeKind::File))
    );
}

#[test]
fn expand_all_restores_default() {
    let mut state = EagerTreeState::new(project(), SelectionPolicy::default());
    state.collapse_all();
    state.expand_all();
    assert!(state.expansion().is_empty());
    assert_eq!(state.visible_rows().len(), 6);
}
