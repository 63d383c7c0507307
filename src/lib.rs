//! Spectra - a branching conversation canvas.
//!
//! Every message is a node, every reply path a branch. The workspace splits
//! the core into three crates, re-exported here:
//! - [`tree`] (`spectra-tree`) - nodes, mutations, interaction state, store
//! - [`layout`] (`spectra-layout`) - zoom tiers and the vine layout
//! - [`view`] (`spectra-view`) - active branch, highlight, dimming, edges
//!
//! This crate adds the combined YAML [`SpectraConfig`] and the [`Canvas`]
//! pipeline tying them together.
//!
//! # Example
//!
//! ```
//! use spectra::{Canvas, SpectraConfig};
//! use spectra::tree::Role;
//!
//! let mut canvas = Canvas::with_paragraph_estimator(SpectraConfig::default());
//! let hi = canvas.store_mut().add_node(None, Role::User, "hi", vec![]).unwrap();
//! canvas.store_mut().add_node(Some(&hi), Role::Assistant, "hello", vec![]).unwrap();
//!
//! let frame = canvas.render();
//! assert_eq!(frame.nodes.len(), 2);
//! assert_eq!(frame.edges.len(), 1);
//! ```

pub mod canvas;
pub mod config;

pub use spectra_layout as layout;
pub use spectra_tree as tree;
pub use spectra_view as view;

pub use canvas::Canvas;
pub use config::SpectraConfig;
