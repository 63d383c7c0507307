//! The conversation tree snapshot and its pure read helpers.
//!
//! Nodes live in a flat sorted map keyed by id; structure is carried by the
//! `parent_id` / `children` links on each node. All traversals are iterative
//! so deeply nested branches cannot exhaust the stack.

use crate::error::TreeError;
use crate::node::{NodeId, Role, TreeNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A rooted conversation tree. `root_id` is `None` iff `nodes` is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTree {
    nodes: BTreeMap<NodeId, TreeNode>,
    root_id: Option<NodeId>,
}

impl ConversationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw parts without checking invariants. Use [`crate::Validate`]
    /// before trusting the result.
    pub fn from_parts(nodes: BTreeMap<NodeId, TreeNode>, root_id: Option<NodeId>) -> Self {
        Self { nodes, root_id }
    }

    pub fn into_parts(self) -> (BTreeMap<NodeId, TreeNode>, Option<NodeId>) {
        (self.nodes, self.root_id)
    }

    pub fn root_id(&self) -> Option<&NodeId> {
        self.root_id.as_ref()
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root_id.as_ref().and_then(|id| self.nodes.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.values()
    }

    pub fn node_map(&self) -> &BTreeMap<NodeId, TreeNode> {
        &self.nodes
    }

    /// Children of `id` in creation order; empty for a missing node.
    pub fn children(&self, id: &str) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Ids from the root down to `id`, inclusive. Empty if `id` is missing.
    pub fn ancestor_path(&self, id: &str) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.nodes.get(id);

        // Bounded by node count so a corrupt parent loop cannot spin forever.
        while let Some(node) = current {
            if path.len() > self.nodes.len() {
                break;
            }
            path.push(node.id.clone());
            current = node.parent_id.as_ref().and_then(|p| self.nodes.get(p));
        }

        path.reverse();
        path
    }

    /// `id` and every node beneath it, in pre-order. Empty if `id` is missing.
    pub fn descendants(&self, id: &str) -> Vec<NodeId> {
        let Some(start) = self.nodes.get(id) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut stack = vec![&start.id];
        while let Some(current) = stack.pop() {
            out.push(current.clone());
            // Reverse push keeps left-to-right pre-order on pop.
            for child in self.children(current.as_str()).iter().rev() {
                if self.nodes.contains_key(child) {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Distance from the root (root = 0). `None` if `id` is missing.
    pub fn depth(&self, id: &str) -> Option<usize> {
        let path = self.ancestor_path(id);
        path.len().checked_sub(1)
    }

    /// Other children of `id`'s parent, in order. Empty for the root or a missing node.
    pub fn siblings(&self, id: &str) -> Vec<NodeId> {
        let Some(parent) = self
            .nodes
            .get(id)
            .and_then(|node| node.parent_id.as_ref())
            .and_then(|parent| self.nodes.get(parent))
        else {
            return Vec::new();
        };

        parent
            .children
            .iter()
            .filter(|child| child.as_str() != id && self.nodes.contains_key(*child))
            .cloned()
            .collect()
    }

    /// Nodes from the root down to `id`: the linear history a model reply is
    /// generated from.
    pub fn conversation_path(&self, id: &str) -> Vec<&TreeNode> {
        self.ancestor_path(id)
            .iter()
            .filter_map(|node_id| self.nodes.get(node_id))
            .collect()
    }

    // =========================================================================
    // STRUCTURAL MUTATIONS (crate-private; `TreeState` is the public surface)
    // =========================================================================

    /// Insert a new node under `parent_id`, or as the root when `None`.
    ///
    /// Adding a second root is rejected rather than replacing the first.
    pub(crate) fn insert(
        &mut self,
        parent_id: Option<&NodeId>,
        role: Role,
        content: String,
        pruned_node_ids: Vec<NodeId>,
    ) -> Result<NodeId, TreeError> {
        match parent_id {
            None => {
                if let Some(root) = &self.root_id {
                    return Err(TreeError::RootExists { root: root.clone() });
                }
            }
            Some(parent) => {
                if !self.nodes.contains_key(parent) {
                    return Err(TreeError::ParentNotFound(parent.clone()));
                }
            }
        }

        let node = TreeNode::new(parent_id.cloned(), role, content, pruned_node_ids);
        let id = node.id.clone();

        match parent_id.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent) => parent.children.push(id.clone()),
            None => self.root_id = Some(id.clone()),
        }
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Remove `id` and its whole subtree. Returns the removed ids in pre-order,
    /// or `None` if `id` was not present.
    pub(crate) fn remove_subtree(&mut self, id: &NodeId) -> Option<(Vec<NodeId>, Option<NodeId>)> {
        let parent_id = self.nodes.get(id)?.parent_id.clone();
        let removed = self.descendants(id.as_str());

        for node_id in &removed {
            self.nodes.remove(node_id);
        }

        if let Some(parent) = parent_id.as_ref().and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|child| child != id);
        }

        if self.root_id.as_ref() == Some(id) {
            self.root_id = None;
        }

        Some((removed, parent_id))
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id)
    }
}
