//! Tree error types.

use crate::node::NodeId;
use thiserror::Error;

/// Errors raised by hard-failing tree operations and snapshot validation.
///
/// Ordinary no-op mutations (unknown id, unchanged value) are not errors;
/// they report an empty [`crate::Changes`] set instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A parentless node was added while a root already exists.
    #[error("Root already exists: {root}")]
    RootExists { root: NodeId },

    /// The requested parent is not in the tree.
    #[error("Parent {0} not found")]
    ParentNotFound(NodeId),

    /// `root_id` is set for an empty map, unset for a non-empty one, or names a missing node.
    #[error("Root mismatch: root_id {root_id:?} with {node_count} nodes")]
    RootMismatch {
        root_id: Option<NodeId>,
        node_count: usize,
    },

    /// The root node has a parent link.
    #[error("Root {0} has a parent")]
    RootHasParent(NodeId),

    /// A second parentless node exists alongside the root.
    #[error("Multiple roots: {node} has no parent but root is {root}")]
    MultipleRoots { node: NodeId, root: NodeId },

    /// Map key and the node's own id disagree.
    #[error("Node ID mismatch: map key '{key}' != node.id '{node_id}'")]
    IdMismatch { key: NodeId, node_id: NodeId },

    #[error("Dangling parent: {node} -> {parent}")]
    DanglingParent { node: NodeId, parent: NodeId },

    #[error("Dangling child: {parent} -> {child}")]
    DanglingChild { parent: NodeId, child: NodeId },

    /// Parent and child links disagree.
    #[error("Parent mismatch: {child} is listed under {parent} but points elsewhere")]
    ParentMismatch { parent: NodeId, child: NodeId },

    #[error("Duplicate child {child} under {parent}")]
    DuplicateChild { parent: NodeId, child: NodeId },

    #[error("Cycle detected at {0}")]
    CycleDetected(NodeId),

    /// Nodes exist that cannot be reached from the root.
    #[error("{count} node(s) unreachable from root")]
    Unreachable { count: usize },

    /// Interaction state names a node that does not exist.
    #[error("Dangling reference in {field}: {id}")]
    DanglingReference { field: &'static str, id: NodeId },

    #[error("Unsupported schema version: {version} (max supported: {max_supported})")]
    UnsupportedSchemaVersion { version: u32, max_supported: u32 },

    #[error("Snapshot serialization failed: {0}")]
    Serialization(String),
}

impl TreeError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RootExists { .. } => "ROOT_EXISTS",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::RootMismatch { .. } => "ROOT_MISMATCH",
            Self::RootHasParent(_) => "ROOT_HAS_PARENT",
            Self::MultipleRoots { .. } => "MULTIPLE_ROOTS",
            Self::IdMismatch { .. } => "ID_MISMATCH",
            Self::DanglingParent { .. } => "DANGLING_PARENT",
            Self::DanglingChild { .. } => "DANGLING_CHILD",
            Self::ParentMismatch { .. } => "PARENT_MISMATCH",
            Self::DuplicateChild { .. } => "DUPLICATE_CHILD",
            Self::CycleDetected(_) => "CYCLE_DETECTED",
            Self::Unreachable { .. } => "UNREACHABLE",
            Self::DanglingReference { .. } => "DANGLING_REFERENCE",
            Self::UnsupportedSchemaVersion { .. } => "UNSUPPORTED_SCHEMA_VERSION",
            Self::Serialization(_) => "SERIALIZATION",
        }
    }

    /// Structural violations break the single-rooted-tree invariant.
    /// Dangling interaction references do not; they can be repaired.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Self::DanglingReference { .. }
                | Self::UnsupportedSchemaVersion { .. }
                | Self::Serialization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(TreeError::ParentNotFound("x".into()).code(), "PARENT_NOT_FOUND");
        assert_eq!(TreeError::CycleDetected("a".into()).code(), "CYCLE_DETECTED");
    }

    #[test]
    fn dangling_reference_is_not_structural() {
        let err = TreeError::DanglingReference {
            field: "focusedNodeId",
            id: "gone".into(),
        };
        assert!(!err.is_structural());
        assert!(TreeError::Unreachable { count: 2 }.is_structural());
        assert!(err.to_string().contains("gone"));
    }
}
