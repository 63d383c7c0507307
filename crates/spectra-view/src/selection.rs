//! Active branch and highlight sets.
//!
//! Highlighting is exact selection: the highlight set is the stored
//! `highlighted_node_ids` that still exist, nothing more. Ancestor closure is
//! available only as an explicit mutation (`highlight_branch`), which writes
//! the whole path into the stored list.

use spectra_tree::{NodeId, TreeState};
use std::collections::HashSet;

/// Resolved interaction sets for one derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    focused: Option<NodeId>,
    /// Root to focus, in order.
    branch: Vec<NodeId>,
    branch_set: HashSet<NodeId>,
    /// Stored order, existing ids only.
    highlighted: Vec<NodeId>,
    highlight_set: HashSet<NodeId>,
}

impl Selection {
    /// Resolve against the tree. Ids that no longer exist are treated as
    /// absent.
    pub fn from_state(state: &TreeState) -> Self {
        let tree = state.tree();
        let focused = state
            .focused_node_id()
            .filter(|id| tree.contains(id.as_str()))
            .cloned();

        let branch = state.active_branch();
        let branch_set = branch.iter().cloned().collect();

        let mut highlight_set = HashSet::new();
        let highlighted: Vec<NodeId> = state
            .highlighted_node_ids()
            .iter()
            .filter(|id| tree.contains(id.as_str()))
            .filter(|id| highlight_set.insert((*id).clone()))
            .cloned()
            .collect();

        Self {
            focused,
            branch,
            branch_set,
            highlighted,
            highlight_set,
        }
    }

    pub fn focused(&self) -> Option<&NodeId> {
        self.focused.as_ref()
    }

    /// Focus mode is on while an existing node is focused.
    pub fn focus_mode(&self) -> bool {
        self.focused.is_some()
    }

    pub fn active_branch(&self) -> &[NodeId] {
        &self.branch
    }

    pub fn highlighted(&self) -> &[NodeId] {
        &self.highlighted
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.focused.as_ref() == Some(id)
    }

    pub fn is_on_branch(&self, id: &NodeId) -> bool {
        self.branch_set.contains(id)
    }

    pub fn is_highlighted(&self, id: &NodeId) -> bool {
        self.highlight_set.contains(id)
    }

    /// Outside focus mode every node counts as on-branch for dimming.
    pub fn counts_as_on_branch(&self, id: &NodeId) -> bool {
        !self.focus_mode() || self.is_on_branch(id)
    }
}
