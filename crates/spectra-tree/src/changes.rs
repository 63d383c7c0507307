//! Change flags - the output protocol from tree mutations.
//!
//! Every mutation returns a `Changes` set describing what it touched.
//! An empty set means the operation was a no-op and the snapshot is unchanged.

use bitflags::bitflags;

bitflags! {
    /// Set of state changes produced by a mutation.
    ///
    /// Consumers use it to decide what to recompute: layout only cares about
    /// structure and content, view derivation cares about everything.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Changes: u16 {
        /// Nodes added or removed.
        const STRUCTURE = 1 << 0;

        /// Node content replaced.
        const CONTENT = 1 << 1;

        /// Streaming status changed.
        const STATUS = 1 << 2;

        /// Cached summary set.
        const SUMMARY = 1 << 3;

        /// Generated label set.
        const LABEL = 1 << 4;

        /// Token counter updated.
        const TOKENS = 1 << 5;

        /// Focus or last-focus pointer moved.
        const FOCUS = 1 << 6;

        /// Highlight list changed.
        const HIGHLIGHT = 1 << 7;
    }
}

impl Default for Changes {
    fn default() -> Self {
        Changes::empty()
    }
}

impl Changes {
    /// Node positions or heights may have moved.
    pub fn affects_layout(&self) -> bool {
        self.intersects(Changes::STRUCTURE | Changes::CONTENT)
    }

    /// Only interaction state changed; layout can be reused as-is.
    pub fn is_interaction_only(&self) -> bool {
        !self.is_empty() && (Changes::FOCUS | Changes::HIGHLIGHT).contains(*self)
    }
}
