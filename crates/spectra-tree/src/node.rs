//! Conversation node types.
//!
//! A `TreeNode` is one message in the conversation. Its identity and parent
//! link are fixed at creation; content, status, summary and label are the
//! only fields that change afterwards.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Opaque node identifier, assigned at creation and never reused.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an existing identifier (e.g. one loaded from a snapshot).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Short speaker tag shown in node chrome.
    pub fn speaker(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "AI",
            Role::System => "System",
        }
    }
}

/// Streaming lifecycle of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Streaming,
    Error,
}

/// A single message in the conversation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: NodeId,

    /// Owning node; `None` only for the root.
    pub parent_id: Option<NodeId>,

    pub role: Role,

    /// Full accumulated text. Streaming replaces it wholesale on every chunk.
    pub content: String,

    /// Short generated title used by the label fidelity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Cached one-sentence summary for low-detail rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default)]
    pub status: NodeStatus,

    #[serde(default)]
    pub token_count: u32,

    /// Creation time in Unix milliseconds. Only used for sorting outside the core.
    pub created_at: i64,

    /// Child ids in creation order (left-to-right layout order).
    #[serde(default)]
    pub children: Vec<NodeId>,

    /// Ancestors this node summarizes. Provenance only, never traversed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pruned_node_ids: Vec<NodeId>,
}

impl TreeNode {
    pub(crate) fn new(
        parent_id: Option<NodeId>,
        role: Role,
        content: String,
        pruned_node_ids: Vec<NodeId>,
    ) -> Self {
        Self {
            id: NodeId::generate(),
            parent_id,
            role,
            content,
            label: None,
            summary: None,
            status: NodeStatus::Idle,
            token_count: 0,
            created_at: chrono::Utc::now().timestamp_millis(),
            children: Vec::new(),
            pruned_node_ids,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_streaming(&self) -> bool {
        self.status == NodeStatus::Streaming
    }

    /// Text for the short-label fidelity: the generated label if present,
    /// otherwise the first `max_chars` characters of content.
    pub fn display_label(&self, max_chars: usize) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => truncate_chars(&self.content, max_chars),
        }
    }

    /// Text for the preview fidelity: summary if cached, else truncated content.
    pub fn preview_text(&self, max_chars: usize) -> String {
        match &self.summary {
            Some(summary) => summary.clone(),
            None => truncate_chars(&self.content, max_chars),
        }
    }
}

/// Truncate on character boundaries, appending `...` when shortened.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
