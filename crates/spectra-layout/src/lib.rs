//! Spectra Layout - the vine layout engine.
//!
//! Turns a conversation tree snapshot and a zoom tier into a positioned
//! [`LayoutGraph`]:
//! - `ZoomTier` / `TierTable` - the four render fidelities and their box sizes
//! - `LayoutConfig` - gaps, layout box width, height estimator tuning
//! - `HeightEstimator` - injected content height strategy
//! - `compute_layout` - the pure two-pass algorithm
//! - `LayoutEngine` - estimator + config + fingerprint-keyed cache
//!
//! # Example
//!
//! ```
//! use spectra_layout::{compute_layout, FixedTierHeight, LayoutConfig, ZoomTier};
//! use spectra_tree::{Role, TreeStore};
//!
//! let mut store = TreeStore::new();
//! let root = store.add_node(None, Role::User, "hi", vec![]).unwrap();
//! let reply = store.add_node(Some(&root), Role::Assistant, "hello", vec![]).unwrap();
//!
//! let config = LayoutConfig::default();
//! let estimator = FixedTierHeight::new(config.tiers);
//! let graph = compute_layout(store.state().tree(), ZoomTier::Full, &config, &estimator);
//!
//! let (parent, child) = (graph.get(root.as_str()).unwrap(), graph.get(reply.as_str()).unwrap());
//! assert_eq!(parent.x, child.x);
//! assert!(child.y >= parent.bottom());
//! ```

mod cache;
mod config;
mod estimate;
mod vine;
mod zoom;

pub use cache::{LayoutCache, LayoutFingerprint};
pub use config::{ConfigError, HeightConfig, LayoutConfig};
pub use estimate::{
    FixedTierHeight, HeightEstimator, MeasuredEstimator, ParagraphEstimator, TextMeasure,
};
pub use vine::{
    compute_layout, LayoutBounds, LayoutEdge, LayoutEngine, LayoutGraph, NodeLayout,
    DEFAULT_CACHE_CAPACITY,
};
pub use zoom::{ParseZoomTierError, TierBox, TierTable, ZoomThresholds, ZoomTier};
