//! Layout fingerprinting and a small LRU of computed layouts.
//!
//! Layout is a pure function of tree structure, node content and tier, so a
//! hash of exactly those inputs identifies a result. Status, summary and
//! interaction state do not take part and never invalidate a layout.

use crate::vine::LayoutGraph;
use crate::zoom::ZoomTier;
use sha2::{Digest, Sha256};
use spectra_tree::ConversationTree;
use std::collections::VecDeque;
use std::sync::Arc;

/// Content-addressed key for one layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutFingerprint {
    /// SHA-256 of the layout inputs, hex encoded.
    pub hash: String,
}

impl LayoutFingerprint {
    pub fn compute(tree: &ConversationTree, tier: ZoomTier) -> Self {
        let mut hasher = Sha256::new();

        hasher.update([tier.index()]);
        hash_str(&mut hasher, tree.root_id().map_or("", |id| id.as_str()));

        // BTreeMap order keeps this stable across runs.
        hasher.update((tree.len() as u64).to_le_bytes());
        for node in tree.nodes() {
            hash_str(&mut hasher, node.id.as_str());
            hash_str(&mut hasher, &node.content);
            hasher.update((node.children.len() as u64).to_le_bytes());
            for child in &node.children {
                hash_str(&mut hasher, child.as_str());
            }
        }

        Self {
            hash: hex::encode(hasher.finalize()),
        }
    }

    /// First 16 hex chars, for logs.
    pub fn short(&self) -> &str {
        &self.hash[..16.min(self.hash.len())]
    }
}

/// Length-prefixed so adjacent fields cannot run together.
fn hash_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

/// Bounded most-recently-used cache of layouts.
#[derive(Debug, Clone)]
pub struct LayoutCache {
    capacity: usize,
    entries: VecDeque<(LayoutFingerprint, Arc<LayoutGraph>)>,
}

impl LayoutCache {
    /// A capacity of 0 disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up `key`, marking it most recently used.
    pub fn get(&mut self, key: &LayoutFingerprint) -> Option<Arc<LayoutGraph>> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        let entry = self.entries.remove(pos)?;
        let graph = Arc::clone(&entry.1);
        self.entries.push_back(entry);
        Some(graph)
    }

    pub fn insert(&mut self, key: LayoutFingerprint, graph: Arc<LayoutGraph>) {
        if self.capacity == 0 {
            return;
        }
        self.entries.retain(|(k, _)| *k != key);
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((key, graph));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
