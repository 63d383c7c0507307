//! Spectra Tree - the conversation tree model.
//!
//! A branching conversation is a tree where every message is a node and every
//! reply path is a branch. This crate owns:
//! - `TreeNode` / `NodeId` - message identity, role, content, status
//! - `ConversationTree` - the node map plus pure read helpers
//! - `TreeState` - tree plus focus/highlight interaction state and mutations
//! - `TreeStore` - single writer handing out immutable `Arc` snapshots
//! - `PersistedTree` - the lossless JSON shape for session stores
//! - Validation - single root, bidirectional links, no cycles
//!
//! # Architecture
//!
//! ```text
//! UI event ──► TreeStore::<op>() ──► Changes (bitflags)
//!                  │
//!                  └─► Arc<TreeState> snapshot ──► layout / view derivation
//!                          ├── tree: { NodeId -> TreeNode }, root_id
//!                          ├── focused_node_id / last_focused_node_id
//!                          └── highlighted_node_ids
//! ```
//!
//! # Example
//!
//! ```
//! use spectra_tree::{Role, TreeStore};
//!
//! let mut store = TreeStore::new();
//! let a = store.add_node(None, Role::User, "hi", vec![]).unwrap();
//! let b = store.add_node(Some(&a), Role::Assistant, "hello", vec![]).unwrap();
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.tree().ancestor_path(b.as_str()), vec![a, b]);
//! ```

mod changes;
mod error;
mod node;
mod persist;
mod state;
mod store;
mod tree;
mod validate;

pub use changes::Changes;
pub use error::TreeError;
pub use node::{truncate_chars, NodeId, NodeStatus, Role, TreeNode};
pub use persist::PersistedTree;
pub use state::TreeState;
pub use store::TreeStore;
pub use tree::ConversationTree;
pub use validate::Validate;

/// Current persisted schema version.
pub const SCHEMA_VERSION: u32 = 1;
