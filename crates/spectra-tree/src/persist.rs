//! Persistence shape for handing snapshots to a durable store.
//!
//! The store itself lives outside the core; this module only guarantees that
//! a `TreeState` round-trips losslessly through JSON.

use crate::error::TreeError;
use crate::node::{NodeId, TreeNode};
use crate::state::TreeState;
use crate::tree::ConversationTree;
use crate::validate::Validate;
use crate::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialized form of a full tree plus interaction state.
///
/// Field names follow the camelCase layout existing session stores use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTree {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub nodes: BTreeMap<NodeId, TreeNode>,
    pub root_id: Option<NodeId>,
    #[serde(default)]
    pub focused_node_id: Option<NodeId>,
    #[serde(default)]
    pub last_focused_node_id: Option<NodeId>,
    #[serde(default)]
    pub highlighted_node_ids: Vec<NodeId>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl PersistedTree {
    pub fn to_json(&self) -> Result<String, TreeError> {
        serde_json::to_string_pretty(self).map_err(|e| TreeError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        serde_json::from_str(json).map_err(|e| TreeError::Serialization(e.to_string()))
    }
}

impl From<&TreeState> for PersistedTree {
    fn from(state: &TreeState) -> Self {
        let tree = state.tree();
        Self {
            schema_version: SCHEMA_VERSION,
            nodes: tree.node_map().clone(),
            root_id: tree.root_id().cloned(),
            focused_node_id: state.focused_node_id().cloned(),
            last_focused_node_id: state.last_focused_node_id().cloned(),
            highlighted_node_ids: state.highlighted_node_ids().to_vec(),
        }
    }
}

impl TryFrom<PersistedTree> for TreeState {
    type Error = TreeError;

    /// Rejects structurally broken trees. Dangling interaction references are
    /// repaired (dropped) rather than rejected.
    fn try_from(persisted: PersistedTree) -> Result<Self, Self::Error> {
        if persisted.schema_version > SCHEMA_VERSION {
            return Err(TreeError::UnsupportedSchemaVersion {
                version: persisted.schema_version,
                max_supported: SCHEMA_VERSION,
            });
        }

        let tree = ConversationTree::from_parts(persisted.nodes, persisted.root_id);
        tree.validate()?;

        let mut state = TreeState {
            tree,
            focused_node_id: persisted.focused_node_id,
            last_focused_node_id: persisted.last_focused_node_id,
            highlighted_node_ids: persisted.highlighted_node_ids,
        };

        let dropped = state.prune_dangling();
        if !dropped.is_empty() {
            tracing::warn!(count = dropped.len(), "dropped dangling interaction references on load");
        }

        Ok(state)
    }
}
