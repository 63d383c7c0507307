//! Snapshot validation.
//!
//! Snapshots loaded from outside MUST be validated before use. Mutations made
//! through [`crate::TreeState`] preserve these invariants on their own.

use crate::error::TreeError;
use crate::node::NodeId;
use crate::state::TreeState;
use crate::tree::ConversationTree;
use std::collections::HashSet;

/// Trait for validatable types.
pub trait Validate {
    /// Validate the object, returning the first violation found.
    fn validate(&self) -> Result<(), TreeError>;
}

impl Validate for ConversationTree {
    fn validate(&self) -> Result<(), TreeError> {
        let root_id = match (self.root_id(), self.is_empty()) {
            (None, true) => return Ok(()),
            (Some(root), false) if self.contains(root.as_str()) => root,
            (root_id, _) => {
                return Err(TreeError::RootMismatch {
                    root_id: root_id.cloned(),
                    node_count: self.len(),
                })
            }
        };

        for (key, node) in self.node_map() {
            if key != &node.id {
                return Err(TreeError::IdMismatch {
                    key: key.clone(),
                    node_id: node.id.clone(),
                });
            }

            match &node.parent_id {
                None if key == root_id => {}
                None => {
                    return Err(TreeError::MultipleRoots {
                        node: key.clone(),
                        root: root_id.clone(),
                    })
                }
                Some(_) if key == root_id => return Err(TreeError::RootHasParent(key.clone())),
                Some(parent_id) => {
                    let parent = self.get(parent_id.as_str()).ok_or_else(|| {
                        TreeError::DanglingParent {
                            node: key.clone(),
                            parent: parent_id.clone(),
                        }
                    })?;
                    if !parent.children.contains(key) {
                        return Err(TreeError::ParentMismatch {
                            parent: parent_id.clone(),
                            child: key.clone(),
                        });
                    }
                }
            }

            check_children(self, key)?;
        }

        check_reachable(self, root_id)
    }
}

fn check_children(tree: &ConversationTree, parent: &NodeId) -> Result<(), TreeError> {
    let mut seen = HashSet::new();
    for child_id in tree.children(parent.as_str()) {
        if !seen.insert(child_id) {
            return Err(TreeError::DuplicateChild {
                parent: parent.clone(),
                child: child_id.clone(),
            });
        }
        let child = tree
            .get(child_id.as_str())
            .ok_or_else(|| TreeError::DanglingChild {
                parent: parent.clone(),
                child: child_id.clone(),
            })?;
        if child.parent_id.as_ref() != Some(parent) {
            return Err(TreeError::ParentMismatch {
                parent: parent.clone(),
                child: child_id.clone(),
            });
        }
    }
    Ok(())
}

/// Walk from the root; every node must be visited exactly once.
fn check_reachable(tree: &ConversationTree, root_id: &NodeId) -> Result<(), TreeError> {
    let mut visited = HashSet::new();
    let mut stack = vec![root_id];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            return Err(TreeError::CycleDetected(current.clone()));
        }
        stack.extend(tree.children(current.as_str()));
    }

    match tree.len() - visited.len() {
        0 => Ok(()),
        count => Err(TreeError::Unreachable { count }),
    }
}

impl Validate for TreeState {
    fn validate(&self) -> Result<(), TreeError> {
        self.tree.validate()?;

        let pointers = [
            ("focusedNodeId", self.focused_node_id.as_ref()),
            ("lastFocusedNodeId", self.last_focused_node_id.as_ref()),
        ];
        let highlights = self
            .highlighted_node_ids
            .iter()
            .map(|id| ("highlightedNodeIds", Some(id)));

        for (field, id) in pointers.into_iter().chain(highlights) {
            if let Some(id) = id.filter(|id| !self.tree.contains(id.as_str())) {
                return Err(TreeError::DanglingReference {
                    field,
                    id: id.clone(),
                });
            }
        }
        Ok(())
    }
}
