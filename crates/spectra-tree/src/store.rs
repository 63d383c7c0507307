//! Snapshot store - the single writer for tree and interaction state.
//!
//! Readers take an `Arc<TreeState>` snapshot and keep it as long as they like;
//! a write never touches a snapshot someone else holds (copy-on-write via
//! `Arc::make_mut`). Every applied change bumps `revision`; a no-op leaves the
//! revision and the snapshot contents untouched.

use crate::changes::Changes;
use crate::error::TreeError;
use crate::node::{NodeId, NodeStatus, Role};
use crate::persist::PersistedTree;
use crate::state::TreeState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug)]
pub struct TreeStore {
    current: Arc<TreeState>,
    revision: u64,
    generation: u64,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::with_state(TreeState::default())
    }
}

/// A clone shares the current snapshot but counts revisions on its own, so
/// it gets a fresh generation.
impl Clone for TreeStore {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
            revision: self.revision,
            generation: next_generation(),
        }
    }
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing state (e.g. one restored from a snapshot).
    pub fn with_state(state: TreeState) -> Self {
        Self {
            current: Arc::new(state),
            revision: 0,
            generation: next_generation(),
        }
    }

    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<TreeState> {
        Arc::clone(&self.current)
    }

    pub fn state(&self) -> &TreeState {
        &self.current
    }

    /// Monotonic counter of applied (non-empty) changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Process-unique id of this store. `(generation, revision)` names one
    /// state across every store in the process.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn apply<F>(&mut self, op: &'static str, f: F) -> Changes
    where
        F: FnOnce(&mut TreeState) -> Changes,
    {
        // A shared snapshot is cloned by make_mut; a no-op hands the original back.
        let shared = (Arc::strong_count(&self.current) > 1).then(|| Arc::clone(&self.current));
        let changes = f(Arc::make_mut(&mut self.current));
        if changes.is_empty() {
            if let Some(prev) = shared {
                self.current = prev;
            }
            tracing::trace!(op, "no-op mutation");
        } else {
            self.revision += 1;
            tracing::debug!(op, revision = self.revision, ?changes, "applied mutation");
        }
        changes
    }

    // =========================================================================
    // TREE OPERATIONS
    // =========================================================================

    pub fn add_node(
        &mut self,
        parent_id: Option<&NodeId>,
        role: Role,
        content: impl Into<String>,
        pruned_node_ids: Vec<NodeId>,
    ) -> Result<NodeId, TreeError> {
        // Check before make_mut so a rejected add never clones a shared snapshot.
        match parent_id {
            None => {
                if let Some(root) = self.current.tree().root_id() {
                    tracing::warn!(%root, "rejected second root");
                    return Err(TreeError::RootExists { root: root.clone() });
                }
            }
            Some(parent) if !self.current.tree().contains(parent.as_str()) => {
                tracing::warn!(%parent, "rejected add under unknown parent");
                return Err(TreeError::ParentNotFound(parent.clone()));
            }
            Some(_) => {}
        }

        let (id, changes) =
            Arc::make_mut(&mut self.current).add_node(parent_id, role, content, pruned_node_ids)?;
        self.revision += 1;
        tracing::debug!(%id, revision = self.revision, ?changes, "added node");
        Ok(id)
    }

    pub fn delete_node(&mut self, id: &NodeId) -> Changes {
        self.apply("delete_node", |s| s.delete_node(id))
    }

    pub fn update_content(&mut self, id: &NodeId, content: &str) -> Changes {
        self.apply("update_content", |s| s.update_content(id, content))
    }

    pub fn set_status(&mut self, id: &NodeId, status: NodeStatus) -> Changes {
        self.apply("set_status", |s| s.set_status(id, status))
    }

    pub fn set_summary(&mut self, id: &NodeId, summary: impl Into<String>) -> Changes {
        self.apply("set_summary", |s| s.set_summary(id, summary))
    }

    pub fn set_label(&mut self, id: &NodeId, label: impl Into<String>) -> Changes {
        self.apply("set_label", |s| s.set_label(id, label))
    }

    pub fn set_token_count(&mut self, id: &NodeId, token_count: u32) -> Changes {
        self.apply("set_token_count", |s| s.set_token_count(id, token_count))
    }

    // =========================================================================
    // INTERACTION OPERATIONS
    // =========================================================================

    pub fn focus_node(&mut self, id: Option<&NodeId>) -> Changes {
        self.apply("focus_node", |s| s.focus_node(id))
    }

    pub fn set_last_focused(&mut self, id: Option<&NodeId>) -> Changes {
        self.apply("set_last_focused", |s| s.set_last_focused(id))
    }

    pub fn toggle_highlight(&mut self, id: &NodeId) -> Changes {
        self.apply("toggle_highlight", |s| s.toggle_highlight(id))
    }

    pub fn highlight_branch(&mut self, id: &NodeId) -> Changes {
        self.apply("highlight_branch", |s| s.highlight_branch(id))
    }

    pub fn clear_highlights(&mut self) -> Changes {
        self.apply("clear_highlights", |s| s.clear_highlights())
    }

    pub fn clear_all(&mut self) -> Changes {
        self.apply("clear_all", |s| s.clear_all())
    }

    // =========================================================================
    // PERSISTENCE BOUNDARY
    // =========================================================================

    /// Atomically replace the whole state with a loaded snapshot.
    ///
    /// A snapshot that fails validation leaves the store untouched.
    pub fn load_state(&mut self, persisted: PersistedTree) -> Result<Changes, TreeError> {
        let state = TreeState::try_from(persisted).inspect_err(|err| {
            tracing::warn!(code = err.code(), %err, "rejected snapshot");
        })?;

        if state == *self.current {
            return Ok(Changes::empty());
        }

        self.current = Arc::new(state);
        self.revision += 1;
        tracing::debug!(
            revision = self.revision,
            nodes = self.current.node_count(),
            "loaded snapshot"
        );
        Ok(Changes::all())
    }

    pub fn persist(&self) -> PersistedTree {
        PersistedTree::from(self.state())
    }
}
