//! Per-item view flags.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Interaction state of one rendered node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct NodeFlags: u8 {
        /// On the root-to-focus path.
        const ON_ACTIVE_BRANCH = 1 << 0;

        const HIGHLIGHTED = 1 << 1;

        /// The focused node.
        const SELECTED = 1 << 2;

        const DIMMED = 1 << 3;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl NodeFlags {
    /// Drawn above ordinary nodes.
    pub fn is_emphasized(self) -> bool {
        self.intersects(Self::ON_ACTIVE_BRANCH | Self::HIGHLIGHTED)
    }
}

bitflags! {
    /// Interaction and drawing state of one rendered edge.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EdgeFlags: u8 {
        /// Both endpoints on the active branch.
        const ON_ACTIVE_BRANCH = 1 << 0;

        /// Both endpoints highlighted.
        const HIGHLIGHTED = 1 << 1;

        const DIMMED = 1 << 2;

        const ANIMATED = 1 << 3;

        const DASHED = 1 << 4;
    }
}

impl Default for EdgeFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl EdgeFlags {
    pub fn is_emphasized(self) -> bool {
        self.intersects(Self::ON_ACTIVE_BRANCH | Self::HIGHLIGHTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emphasis_needs_branch_or_highlight() {
        assert!(!NodeFlags::default().is_emphasized());
        assert!(!(NodeFlags::SELECTED | NodeFlags::DIMMED).is_emphasized());
        assert!(NodeFlags::HIGHLIGHTED.is_emphasized());
        assert!((EdgeFlags::ON_ACTIVE_BRANCH | EdgeFlags::ANIMATED).is_emphasized());
        assert!(!(EdgeFlags::DASHED | EdgeFlags::ANIMATED).is_emphasized());
    }
}
