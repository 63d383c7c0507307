//! Spectra View - view-state derivation.
//!
//! Takes a tree snapshot, its [`LayoutGraph`](spectra_layout::LayoutGraph)
//! and the interaction state, and produces a [`RenderGraph`]: positioned
//! nodes and styled edges carrying active-branch, highlight, selection and
//! dimming flags plus z-order.
//!
//! ```text
//! TreeState ─┬─► Selection (branch set, highlight set)
//!            │        │
//! LayoutGraph┴────────┴─► derive_view ─► RenderGraph
//!                              ▲
//!                  ViewStyle ──┘
//! ```

mod derive;
mod flags;
mod selection;
mod style;

pub use derive::{
    derive_view, derive_with_selection, fidelity_text, pruning_edges, EdgeKind, NodeKind,
    RenderEdge, RenderGraph, RenderNode,
};
pub use flags::{EdgeFlags, NodeFlags};
pub use selection::Selection;
pub use style::{EdgeStroke, TextLimits, ViewStyle, ZBands};
