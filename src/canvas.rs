//! The mutation -> layout -> view pipeline.
//!
//! A [`Canvas`] owns the tree store, the layout engine and the current zoom
//! tier. Callers mutate through [`Canvas::store_mut`] and pull frames with
//! [`Canvas::render`], which re-derives only when the store (generation and
//! revision) or the tier moved since the last frame.

use crate::config::SpectraConfig;
use spectra_layout::{
    HeightEstimator, LayoutEngine, LayoutGraph, ParagraphEstimator, TierTable, ZoomThresholds,
    ZoomTier,
};
use spectra_tree::{PersistedTree, TreeError, TreeState, TreeStore};
use spectra_view::{derive_view, RenderGraph, ViewStyle};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameKey {
    generation: u64,
    revision: u64,
    tier: ZoomTier,
}

#[derive(Debug)]
struct Frame {
    key: FrameKey,
    graph: Arc<RenderGraph>,
}

pub struct Canvas<E> {
    store: TreeStore,
    engine: LayoutEngine<E>,
    style: ViewStyle,
    tiers: TierTable,
    thresholds: ZoomThresholds,
    tier: ZoomTier,
    frame: Option<Frame>,
}

impl Canvas<ParagraphEstimator> {
    /// Canvas with the built-in paragraph height heuristic.
    pub fn with_paragraph_estimator(config: SpectraConfig) -> Self {
        let estimator = ParagraphEstimator::new(config.layout.height.clone(), config.layout.tiers);
        Self::new(config, estimator)
    }
}

impl<E: HeightEstimator> Canvas<E> {
    pub fn new(config: SpectraConfig, estimator: E) -> Self {
        let SpectraConfig {
            layout,
            view,
            initial_tier,
            layout_cache,
        } = config;
        let tiers = layout.tiers;
        let thresholds = layout.zoom;

        Self {
            store: TreeStore::new(),
            engine: LayoutEngine::new(layout, estimator).with_cache_capacity(layout_cache),
            style: view,
            tiers,
            thresholds,
            tier: initial_tier,
            frame: None,
        }
    }

    /// Start from a persisted snapshot. Fails if the snapshot is invalid.
    pub fn from_persisted(
        config: SpectraConfig,
        estimator: E,
        persisted: PersistedTree,
    ) -> Result<Self, TreeError> {
        let mut canvas = Self::new(config, estimator);
        canvas.store.load_state(persisted)?;
        Ok(canvas)
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    /// Mutable store access. Every applied change bumps the store revision,
    /// and a replaced store carries a new generation; either invalidates the
    /// current frame.
    pub fn store_mut(&mut self) -> &mut TreeStore {
        &mut self.store
    }

    pub fn state(&self) -> &TreeState {
        self.store.state()
    }

    pub fn tier(&self) -> ZoomTier {
        self.tier
    }

    pub fn style(&self) -> &ViewStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: ViewStyle) {
        if self.style != style {
            self.style = style;
            self.frame = None;
        }
    }

    /// Returns `true` if the tier changed.
    pub fn set_zoom_tier(&mut self, tier: ZoomTier) -> bool {
        if self.tier == tier {
            return false;
        }
        debug!(from = %self.tier, to = %tier, "zoom tier changed");
        self.tier = tier;
        true
    }

    /// Map a continuous viewport zoom onto a tier and apply it.
    pub fn set_viewport_zoom(&mut self, zoom: f32) -> ZoomTier {
        let tier = ZoomTier::from_viewport_zoom(zoom, &self.thresholds);
        self.set_zoom_tier(tier);
        tier
    }

    /// Layout of the current tree at the current tier.
    pub fn layout(&mut self) -> Arc<LayoutGraph> {
        self.engine.layout(self.store.state().tree(), self.tier)
    }

    /// The current frame, re-derived if the tree, interaction state or tier
    /// changed since the last call.
    pub fn render(&mut self) -> Arc<RenderGraph> {
        let key = FrameKey {
            generation: self.store.generation(),
            revision: self.store.revision(),
            tier: self.tier,
        };
        if let Some(frame) = self.frame.as_ref().filter(|f| f.key == key) {
            return Arc::clone(&frame.graph);
        }

        let layout = self.layout();
        let graph = Arc::new(derive_view(
            self.store.state(),
            &layout,
            &self.tiers,
            &self.style,
        ));
        self.frame = Some(Frame {
            key,
            graph: Arc::clone(&graph),
        });
        graph
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for Canvas<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("revision", &self.store.revision())
            .field("nodes", &self.store.state().node_count())
            .field("tier", &self.tier)
            .field("engine", &self.engine)
            .finish()
    }
}
