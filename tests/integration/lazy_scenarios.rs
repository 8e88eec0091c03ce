use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join;
use tokio::sync::Notify;
use treestate::engine::{Activation, LazyTreeState};
use treestate::index::{DataSource, FetchParent, Parent, TreeIndex};
use treestate::{Node, SelectionPolicy, TreeError};

/// Root holds one folder `dir`; `dir` holds `x.txt`. Counts calls per parent.
#[derive(Default)]
struct DirSource {
    root_calls: AtomicUsize,
    dir_calls: AtomicUsize,
}

#[async_trait]
impl DataSource for DirSource {
    async fn children(&self, parent: &FetchParent) -> Result<Vec<Node>, TreeError> {
        tokio::task::yield_now().await;
        match parent.path() {
            None => {
                self.root_calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![Node::folder("dir", vec![])])
            }
            Some("dir") => {
                self.dir_calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![Node::file("x.txt")])
            }
            Some(other) => Err(TreeError::NotFound(other.to_string())),
        }
    }
}

#[tokio::test]
async fn path_of_child_fetched_through_parent() {
    let index = TreeIndex::new(DirSource::default());
    let roots = index.children_of(Parent::Root).await.unwrap();
    let dir = &roots[0];
    assert!(dir.node.is_folder());

    let children = index.children_of(Parent::Node(dir.id)).await.unwrap();
    assert_eq!(children[0].node.name(), "x.txt");
    assert_eq!(index.path_of(children[0].id).unwrap(), "dir/x.txt");
}

#[tokio::test]
async fn duplicate_in_flight_fetches_agree() {
    let index = TreeIndex::new(DirSource::default());
    let (a, b) = join(
        index.children_of(Parent::Root),
        index.children_of(Parent::Root),
    )
    .await;
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a, b);
    assert_eq!(index.len(), 1);
    assert_eq!(index.path_of(a[0].id).unwrap(), "dir");
}

#[tokio::test]
async fn collapse_all_then_select_reveals_ancestors() {
    let mut state = LazyTreeState::new(DirSource::default(), SelectionPolicy::default());
    state.collapse_all();
    let event = state.select_file("dir/x.txt").await.unwrap().unwrap();
    assert_eq!(event.path, "dir/x.txt");

    let dir = state.index().find_by_path("dir").await.unwrap();
    assert!(state.is_expanded(dir.id));
    assert!(state.is_selected("dir/x.txt"));
    assert_eq!(state.index().source().root_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.index().source().dir_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expand_ancestors_is_idempotent_in_lazy_mode() {
    let mut state = LazyTreeState::new(DirSource::default(), SelectionPolicy::default());
    state.select_file("dir/x.txt").await.unwrap();
    let once = state.expansion().clone();
    state.select_file("dir/x.txt").await.unwrap();
    assert_eq!(state.expansion(), &once);
}

#[tokio::test]
async fn folder_activation_toggles_without_selection() {
    let mut state = LazyTreeState::new(DirSource::default(), SelectionPolicy::default());
    let mut events = state.subscribe();
    let roots = state.children_of(Parent::Root).await.unwrap();

    assert_eq!(
        state.on_node_activate(roots[0].id).unwrap(),
        Activation::Toggled { expanded: true }
    );
    let rows = state.visible_rows().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(state.selected(), None);
    assert!(events.try_recv().is_err());
}

/// Signals once the fetch is underway, then blocks until released.
struct GatedSource {
    started: Arc<Notify>,
    gate: Arc<Notify>,
}

#[async_trait]
impl DataSource for GatedSource {
    async fn children(&self, _parent: &FetchParent) -> Result<Vec<Node>, TreeError> {
        self.started.notify_one();
        self.gate.notified().await;
        Ok(vec![Node::file("late.txt")])
    }
}

#[tokio::test]
async fn reset_abandons_in_flight_fetch() {
    let started = Arc::new(Notify::new());
    let gate = Arc::new(Notify::new());
    let index = Arc::new(TreeIndex::new(GatedSource {
        started: started.clone(),
        gate: gate.clone(),
    }));

    let fetching = index.clone();
    let handle = tokio::spawn(async move { fetching.children_of(Parent::Root).await });

    started.notified().await;
    index.reset();
    gate.notify_one();

    assert_eq!(handle.await.unwrap(), Err(TreeError::Stale));
    assert!(index.is_empty());
    assert!(index.cached_children(Parent::Root).is_none());
}
