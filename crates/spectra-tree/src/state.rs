//! Tree plus interaction state, and every mutation the UI can request.
//!
//! Each operation either applies fully and reports what it touched, or leaves
//! the state untouched and reports an empty [`Changes`] set. Only `add_node`
//! can fail outright.

use crate::changes::Changes;
use crate::error::TreeError;
use crate::node::{NodeId, NodeStatus, Role, TreeNode};
use crate::tree::ConversationTree;
use std::collections::HashSet;

/// The full observable state: the tree and the user's interaction pointers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeState {
    pub(crate) tree: ConversationTree,

    /// Focus-mode anchor; root-to-here is the active branch.
    pub(crate) focused_node_id: Option<NodeId>,

    /// Last non-null focus. Where the next message attaches when focus is cleared.
    pub(crate) last_focused_node_id: Option<NodeId>,

    /// Multi-selection in insertion order, no duplicates.
    pub(crate) highlighted_node_ids: Vec<NodeId>,
}

impl TreeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &ConversationTree {
        &self.tree
    }

    pub fn focused_node_id(&self) -> Option<&NodeId> {
        self.focused_node_id.as_ref()
    }

    pub fn last_focused_node_id(&self) -> Option<&NodeId> {
        self.last_focused_node_id.as_ref()
    }

    pub fn highlighted_node_ids(&self) -> &[NodeId] {
        &self.highlighted_node_ids
    }

    // =========================================================================
    // SELECTORS
    // =========================================================================

    /// Focused node, if focus points at an existing node.
    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.focused_node_id
            .as_ref()
            .and_then(|id| self.tree.get(id.as_str()))
    }

    /// Where the next message attaches: focus, else last focus.
    pub fn effective_parent_id(&self) -> Option<&NodeId> {
        self.focused_node_id
            .as_ref()
            .or(self.last_focused_node_id.as_ref())
            .filter(|id| self.tree.contains(id.as_str()))
    }

    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    /// Root-to-focus path; empty when nothing (existing) is focused.
    pub fn active_branch(&self) -> Vec<NodeId> {
        match &self.focused_node_id {
            Some(id) => self.tree.ancestor_path(id.as_str()),
            None => Vec::new(),
        }
    }

    // =========================================================================
    // TREE MUTATIONS
    // =========================================================================

    /// Append a message under `parent_id`, or create the root when `None`.
    ///
    /// The new node becomes the focus and the only highlighted node.
    /// Fails with [`TreeError::RootExists`] when `parent_id` is `None` and a
    /// root already exists, and with [`TreeError::ParentNotFound`] for an
    /// unknown parent. The state is untouched on error.
    pub fn add_node(
        &mut self,
        parent_id: Option<&NodeId>,
        role: Role,
        content: impl Into<String>,
        pruned_node_ids: Vec<NodeId>,
    ) -> Result<(NodeId, Changes), TreeError> {
        let id = self
            .tree
            .insert(parent_id, role, content.into(), pruned_node_ids)?;

        self.focused_node_id = Some(id.clone());
        self.last_focused_node_id = Some(id.clone());
        self.highlighted_node_ids = vec![id.clone()];

        Ok((id, Changes::STRUCTURE | Changes::FOCUS | Changes::HIGHLIGHT))
    }

    /// Delete `id` and its whole subtree.
    ///
    /// Focus pointers into the removed subtree move to the deleted node's
    /// parent; removed ids are dropped from the highlight list.
    pub fn delete_node(&mut self, id: &NodeId) -> Changes {
        let Some((removed, parent_id)) = self.tree.remove_subtree(id) else {
            return Changes::empty();
        };

        let removed: HashSet<NodeId> = removed.into_iter().collect();
        let mut changes = Changes::STRUCTURE;

        for pointer in [&mut self.focused_node_id, &mut self.last_focused_node_id] {
            if pointer.as_ref().is_some_and(|p| removed.contains(p)) {
                *pointer = parent_id.clone();
                changes |= Changes::FOCUS;
            }
        }

        let before = self.highlighted_node_ids.len();
        self.highlighted_node_ids.retain(|h| !removed.contains(h));
        if self.highlighted_node_ids.len() != before {
            changes |= Changes::HIGHLIGHT;
        }

        changes
    }

    /// Replace a node's content with the full accumulated text.
    pub fn update_content(&mut self, id: &NodeId, content: &str) -> Changes {
        match self.tree.node_mut(id.as_str()) {
            Some(node) if node.content != content => {
                node.content = content.to_string();
                Changes::CONTENT
            }
            _ => Changes::empty(),
        }
    }

    pub fn set_status(&mut self, id: &NodeId, status: NodeStatus) -> Changes {
        match self.tree.node_mut(id.as_str()) {
            Some(node) if node.status != status => {
                node.status = status;
                Changes::STATUS
            }
            _ => Changes::empty(),
        }
    }

    pub fn set_summary(&mut self, id: &NodeId, summary: impl Into<String>) -> Changes {
        let summary = summary.into();
        match self.tree.node_mut(id.as_str()) {
            Some(node) if node.summary.as_deref() != Some(summary.as_str()) => {
                node.summary = Some(summary);
                Changes::SUMMARY
            }
            _ => Changes::empty(),
        }
    }

    pub fn set_label(&mut self, id: &NodeId, label: impl Into<String>) -> Changes {
        let label = label.into();
        match self.tree.node_mut(id.as_str()) {
            Some(node) if node.label.as_deref() != Some(label.as_str()) => {
                node.label = Some(label);
                Changes::LABEL
            }
            _ => Changes::empty(),
        }
    }

    pub fn set_token_count(&mut self, id: &NodeId, token_count: u32) -> Changes {
        match self.tree.node_mut(id.as_str()) {
            Some(node) if node.token_count != token_count => {
                node.token_count = token_count;
                Changes::TOKENS
            }
            _ => Changes::empty(),
        }
    }

    // =========================================================================
    // INTERACTION MUTATIONS
    // =========================================================================

    /// Enter focus mode on `id`, or leave it with `None`.
    ///
    /// Focusing an unknown id is a no-op.
    pub fn focus_node(&mut self, id: Option<&NodeId>) -> Changes {
        match id {
            Some(id) if !self.tree.contains(id.as_str()) => Changes::empty(),
            Some(id) => {
                if self.focused_node_id.as_ref() == Some(id)
                    && self.last_focused_node_id.as_ref() == Some(id)
                {
                    return Changes::empty();
                }
                self.focused_node_id = Some(id.clone());
                self.last_focused_node_id = Some(id.clone());
                Changes::FOCUS
            }
            None if self.focused_node_id.is_none() => Changes::empty(),
            None => {
                self.focused_node_id = None;
                Changes::FOCUS
            }
        }
    }

    pub fn set_last_focused(&mut self, id: Option<&NodeId>) -> Changes {
        if id.is_some_and(|id| !self.tree.contains(id.as_str()))
            || self.last_focused_node_id.as_ref() == id
        {
            return Changes::empty();
        }
        self.last_focused_node_id = id.cloned();
        Changes::FOCUS
    }

    /// Add `id` to the highlight list, or remove it if already present.
    pub fn toggle_highlight(&mut self, id: &NodeId) -> Changes {
        if let Some(pos) = self.highlighted_node_ids.iter().position(|h| h == id) {
            self.highlighted_node_ids.remove(pos);
            return Changes::HIGHLIGHT;
        }
        if !self.tree.contains(id.as_str()) {
            return Changes::empty();
        }
        self.highlighted_node_ids.push(id.clone());
        Changes::HIGHLIGHT
    }

    /// Replace the highlight list with the root-to-`id` path.
    pub fn highlight_branch(&mut self, id: &NodeId) -> Changes {
        let path = self.tree.ancestor_path(id.as_str());
        if path.is_empty() || path == self.highlighted_node_ids {
            return Changes::empty();
        }
        self.highlighted_node_ids = path;
        Changes::HIGHLIGHT
    }

    pub fn clear_highlights(&mut self) -> Changes {
        if self.highlighted_node_ids.is_empty() {
            return Changes::empty();
        }
        self.highlighted_node_ids.clear();
        Changes::HIGHLIGHT
    }

    /// Drop the whole conversation and all interaction state.
    pub fn clear_all(&mut self) -> Changes {
        if *self == TreeState::default() {
            return Changes::empty();
        }
        *self = TreeState::default();
        Changes::all()
    }

    /// Drop interaction references to nodes that no longer exist.
    /// Returns the ids that were dropped.
    pub(crate) fn prune_dangling(&mut self) -> Vec<NodeId> {
        let mut dropped = Vec::new();

        for pointer in [&mut self.focused_node_id, &mut self.last_focused_node_id] {
            if let Some(id) = pointer.take_if(|id| !self.tree.contains(id.as_str())) {
                dropped.push(id);
            }
        }

        let mut seen = HashSet::new();
        self.highlighted_node_ids.retain(|id| {
            let keep = self.tree.contains(id.as_str()) && seen.insert(id.clone());
            if !keep {
                dropped.push(id.clone());
            }
            keep
        });

        dropped
    }
}
