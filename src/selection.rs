//! Selection Controller
//!
//! Owns the single selected path, applies the folder-selection policy, reveals
//! the selection through the expansion store and notifies subscribers.

use crate::error::TreeError;
use crate::expansion::PathExpansion;
use crate::tree::NodeKind;
use crate::types::TreePath;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the notification channel; slow subscribers observe `Lagged`.
const EVENT_CAPACITY: usize = 64;

/// Selection policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// When false, folders only toggle expansion and never become selected
    #[serde(default)]
    pub folder_selectable: bool,
}

/// Notification emitted whenever a selection succeeds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEvent {
    pub path: TreePath,
    pub is_file: bool,
    pub node_type: NodeKind,
}

pub struct SelectionController {
    policy: SelectionPolicy,
    selected: Option<TreePath>,
    events: broadcast::Sender<SelectionEvent>,
}

impl SelectionController {
    pub fn new(policy: SelectionPolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            policy,
            selected: None,
            events,
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: SelectionPolicy) {
        self.policy = policy;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selected.as_deref() == Some(path)
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Receive every successful selection from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SelectionEvent> {
        self.events.subscribe()
    }

    pub fn can_select(&self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::File => true,
            NodeKind::Folder => self.policy.folder_selectable,
        }
    }

    /// Select `path`, revealing it through the caller-supplied `reveal` step.
    ///
    /// Returns `Ok(None)` when the policy suppresses the selection. If `reveal`
    /// fails, the prior selection is kept and nothing is emitted.
    pub fn select_with<F>(
        &mut self,
        path: &str,
        kind: NodeKind,
        reveal: F,
    ) -> Result<Option<SelectionEvent>, TreeError>
    where
        F: FnOnce(&str) -> Result<(), TreeError>,
    {
        if !self.can_select(kind) {
            debug!(path, "Selection suppressed by folder policy");
            return Ok(None);
        }
        reveal(path)?;
        self.selected = Some(path.to_string());

        let event = SelectionEvent {
            path: path.to_string(),
            is_file: kind == NodeKind::File,
            node_type: kind,
        };
        // No subscribers is fine; the event is also returned to the caller.
        let _ = self.events.send(event.clone());
        debug!(path, kind = kind.as_str(), "Selected node");
        Ok(Some(event))
    }

    /// Eager-mode selection: expands every ancestor folder of `path`.
    pub fn select(
        &mut self,
        path: &str,
        kind: NodeKind,
        expansion: &mut PathExpansion,
    ) -> Option<SelectionEvent> {
        self.select_with(path, kind, |path| {
            expansion.expand_ancestors_of(path);
            Ok(())
        })
        .unwrap_or(None)
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(SelectionPolicy::default())
    }
}
