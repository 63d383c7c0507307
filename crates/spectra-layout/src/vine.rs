//! Vine layout - two traversals over a fixed-width layout box.
//!
//! Pass 1 (post-order) assigns `x`: leaves take consecutive slots from a
//! running cursor, parents sit at the mean of their first and last child.
//! Heights are estimated in the same pass.
//!
//! Pass 2 (pre-order) assigns `y`: the root sits at 0 and every child sits
//! `y_gap` below its parent's bottom edge. Y depends only on ancestors, never
//! on sibling subtrees.
//!
//! `x` is the node's horizontal center and `y` its top edge. Positions are
//! computed from full-tier heights whatever tier is requested, so zooming
//! never moves a node; only the rendered box changes.
//!
//! Both passes use explicit stacks, so deep branches cannot exhaust the call
//! stack.

use crate::cache::{LayoutCache, LayoutFingerprint};
use crate::config::LayoutConfig;
use crate::estimate::HeightEstimator;
use crate::zoom::{TierBox, ZoomTier};
use serde::{Deserialize, Serialize};
use spectra_tree::{ConversationTree, NodeId};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Number of layouts the engine keeps by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

// =============================================================================
// OUTPUT
// =============================================================================

/// Position and size of one node in the abstract layout plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLayout {
    /// Horizontal center.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Rendered height at the tier the layout was requested for.
    pub height: f32,
    /// Full-tier height used for vertical spacing.
    pub layout_height: f32,
}

impl NodeLayout {
    /// Top-left corner of a rendered box of `size`.
    pub fn render_origin(&self, size: TierBox) -> (f32, f32) {
        (self.x - size.width / 2.0, self.y)
    }

    /// Bottom edge of the layout box.
    pub fn bottom(&self) -> f32 {
        self.y + self.layout_height
    }
}

/// Parent to child link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub source: NodeId,
    pub target: NodeId,
}

/// Axis-aligned extent of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl LayoutBounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Result of one layout run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutGraph {
    pub tier: ZoomTier,
    pub nodes: BTreeMap<NodeId, NodeLayout>,
    /// Tree edges in pre-order.
    pub edges: Vec<LayoutEdge>,
}

impl LayoutGraph {
    pub fn empty(tier: ZoomTier) -> Self {
        Self {
            tier,
            nodes: BTreeMap::new(),
            edges: Vec::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Extent of every node's layout box of `width`, or `None` when empty.
    pub fn bounds(&self, width: f32) -> Option<LayoutBounds> {
        self.nodes.values().fold(None, |acc, node| {
            let (left, top) = (node.x - width / 2.0, node.y);
            let (right, bottom) = (left + width, node.bottom());
            Some(match acc {
                None => LayoutBounds {
                    min_x: left,
                    min_y: top,
                    max_x: right,
                    max_y: bottom,
                },
                Some(b) => LayoutBounds {
                    min_x: b.min_x.min(left),
                    min_y: b.min_y.min(top),
                    max_x: b.max_x.max(right),
                    max_y: b.max_y.max(bottom),
                },
            })
        })
    }
}

// =============================================================================
// ALGORITHM
// =============================================================================

struct Measured {
    x: f32,
    height: f32,
    layout_height: f32,
}

fn live_children<'a>(tree: &'a ConversationTree, id: &NodeId) -> Vec<&'a NodeId> {
    tree.children(id.as_str())
        .iter()
        .filter(|child| tree.contains(child.as_str()))
        .collect()
}

/// Lay out every node reachable from the root.
///
/// Pure: identical inputs give identical output. Children missing from the
/// node map and nodes revisited through a corrupt link are skipped.
pub fn compute_layout<E>(
    tree: &ConversationTree,
    tier: ZoomTier,
    config: &LayoutConfig,
    estimator: &E,
) -> LayoutGraph
where
    E: HeightEstimator + ?Sized,
{
    let Some(root) = tree.root_id().filter(|id| tree.contains(id.as_str())) else {
        return LayoutGraph::empty(tier);
    };

    let full_fallback = config.tiers.full.height;
    let tier_fallback = config.tiers.get(tier).height;
    let mut fallbacks = 0usize;
    let mut estimate = |content: &str, at: ZoomTier, fallback: f32| -> f32 {
        match estimator.estimate(content, at) {
            Some(h) if h.is_finite() && h >= 0.0 => h,
            _ => {
                fallbacks += 1;
                fallback
            }
        }
    };

    // Pass 1: post-order X, heights alongside.
    let mut measured: HashMap<&NodeId, Measured> = HashMap::with_capacity(tree.len());
    let mut entered: HashSet<&NodeId> = HashSet::with_capacity(tree.len());
    let mut next_leaf_x = 0.0_f32;
    let mut stack: Vec<(&NodeId, bool)> = vec![(root, false)];

    while let Some((id, children_done)) = stack.pop() {
        let children: Vec<&NodeId> = live_children(tree, id)
            .into_iter()
            .filter(|child| children_done || !entered.contains(child))
            .collect();

        if !children_done {
            if !entered.insert(id) {
                continue;
            }
            if !children.is_empty() {
                stack.push((id, true));
                stack.extend(children.iter().rev().map(|child| (*child, false)));
                continue;
            }
        }

        let placed: Vec<f32> = children
            .iter()
            .filter_map(|child| measured.get(child).map(|m| m.x))
            .collect();
        let x = match (placed.first(), placed.last()) {
            (Some(first), Some(last)) => (first + last) / 2.0,
            _ => {
                let x = next_leaf_x;
                next_leaf_x += config.leaf_stride();
                x
            }
        };

        let Some(node) = tree.get(id.as_str()) else {
            continue;
        };
        let layout_height = estimate(&node.content, ZoomTier::Full, full_fallback);
        // The rendered box never outgrows the full-tier slot it was laid out in.
        let height = if tier.is_full() {
            layout_height
        } else {
            estimate(&node.content, tier, tier_fallback).min(layout_height)
        };
        measured.insert(
            id,
            Measured {
                x,
                height,
                layout_height,
            },
        );
    }

    if fallbacks > 0 {
        warn!(
            fallbacks,
            tier = %tier,
            "height estimate unavailable, using tier box height"
        );
    }

    // Pass 2: pre-order Y.
    let mut graph = LayoutGraph::empty(tier);
    let mut stack: Vec<(&NodeId, f32, Option<&NodeId>)> = vec![(root, 0.0, None)];

    while let Some((id, y, parent)) = stack.pop() {
        if graph.nodes.contains_key(id) {
            continue;
        }
        let Some(m) = measured.get(id) else {
            continue;
        };
        graph.nodes.insert(
            id.clone(),
            NodeLayout {
                x: m.x,
                y,
                height: m.height,
                layout_height: m.layout_height,
            },
        );
        if let Some(parent) = parent {
            graph.edges.push(LayoutEdge {
                source: parent.clone(),
                target: id.clone(),
            });
        }

        let child_y = y + m.layout_height + config.y_gap;
        for child in live_children(tree, id).into_iter().rev() {
            stack.push((child, child_y, Some(id)));
        }
    }

    graph
}

// =============================================================================
// ENGINE
// =============================================================================

/// Layout with an injected estimator and a small result cache.
pub struct LayoutEngine<E> {
    config: LayoutConfig,
    estimator: E,
    cache: LayoutCache,
}

impl<E: HeightEstimator> LayoutEngine<E> {
    pub fn new(config: LayoutConfig, estimator: E) -> Self {
        Self {
            config,
            estimator,
            cache: LayoutCache::new(DEFAULT_CACHE_CAPACITY),
        }
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = LayoutCache::new(capacity);
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Layout of `tree` at `tier`, served from cache when the tree's layout
    /// inputs are unchanged.
    pub fn layout(&mut self, tree: &ConversationTree, tier: ZoomTier) -> Arc<LayoutGraph> {
        let key = LayoutFingerprint::compute(tree, tier);
        if let Some(graph) = self.cache.get(&key) {
            trace!(fingerprint = key.short(), "layout cache hit");
            return graph;
        }

        let graph = Arc::new(compute_layout(tree, tier, &self.config, &self.estimator));
        debug!(
            nodes = graph.len(),
            tier = %tier,
            fingerprint = key.short(),
            "layout recomputed"
        );
        self.cache.insert(key, Arc::clone(&graph));
        graph
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for LayoutEngine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("config", &self.config)
            .field("estimator", &self.estimator)
            .field("cached", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::FixedTierHeight;
    use pretty_assertions::assert_eq;
    use spectra_tree::{Role, TreeStore};

    /// Content doubles as the full-tier height; lower tiers get 10.
    fn numeric(content: &str, tier: ZoomTier) -> Option<f32> {
        match tier {
            ZoomTier::Full => content.parse().ok(),
            _ => Some(10.0),
        }
    }

    fn build(shape: &[(Option<usize>, &str)]) -> (ConversationTree, Vec<NodeId>) {
        let mut store = TreeStore::new();
        let mut ids: Vec<NodeId> = Vec::new();
        for (parent, content) in shape {
            let parent = parent.map(|i| ids[i].clone());
            let id = store
                .add_node(parent.as_ref(), Role::User, *content, vec![])
                .unwrap();
            ids.push(id);
        }
        (store.state().tree().clone(), ids)
    }

    fn layout(tree: &ConversationTree, tier: ZoomTier) -> LayoutGraph {
        compute_layout(tree, tier, &LayoutConfig::default(), &numeric)
    }

    #[test]
    fn three_leaves_center_parent_on_first_and_last() {
        let (tree, ids) = build(&[
            (None, "100"),
            (Some(0), "300"),
            (Some(0), "500"),
            (Some(0), "700"),
        ]);
        let g = layout(&tree, ZoomTier::Full);
        let stride = LayoutConfig::default().leaf_stride();

        let x: Vec<f32> = ids.iter().map(|id| g.get(id.as_str()).unwrap().x).collect();
        assert_eq!(x, vec![stride, 0.0, stride, 2.0 * stride]);

        let heights: Vec<f32> = ids[1..]
            .iter()
            .map(|id| g.get(id.as_str()).unwrap().height)
            .collect();
        assert_eq!(heights, vec![300.0, 500.0, 700.0]);

        // All three share the root's bottom edge plus the gap.
        for id in &ids[1..] {
            assert_eq!(g.get(id.as_str()).unwrap().y, 100.0 + 120.0);
        }
    }

    #[test]
    fn parent_ignores_middle_child_subtree_width() {
        // Middle child has two leaves; the root still averages first and last.
        let (tree, ids) = build(&[
            (None, "200"),
            (Some(0), "200"),
            (Some(0), "200"),
            (Some(0), "200"),
            (Some(2), "200"),
            (Some(2), "200"),
        ]);
        let g = layout(&tree, ZoomTier::Full);
        let x = |i: usize| g.get(ids[i].as_str()).unwrap().x;

        assert_eq!(x(0), (x(1) + x(3)) / 2.0);
        assert_eq!(x(2), (x(4) + x(5)) / 2.0);
        assert!(x(1) < x(4) && x(5) < x(3));
    }

    #[test]
    fn y_accumulates_ancestor_heights_only() {
        let (tree, ids) = build(&[
            (None, "200"),
            (Some(0), "900"),
            (Some(0), "300"),
            (Some(1), "200"),
            (Some(2), "200"),
        ]);
        let g = layout(&tree, ZoomTier::Full);
        let y = |i: usize| g.get(ids[i].as_str()).unwrap().y;

        assert_eq!(y(0), 0.0);
        assert_eq!(y(1), 320.0);
        assert_eq!(y(3), 320.0 + 900.0 + 120.0);
        assert_eq!(y(4), 320.0 + 300.0 + 120.0);
    }

    #[test]
    fn positions_are_stable_across_tiers() {
        let (tree, _) = build(&[(None, "250"), (Some(0), "600"), (Some(1), "400")]);
        let full = layout(&tree, ZoomTier::Full);

        for tier in ZoomTier::ALL {
            let g = layout(&tree, tier);
            for (id, node) in &g.nodes {
                let reference = full.nodes[id];
                assert_eq!((node.x, node.y), (reference.x, reference.y));
                assert_eq!(node.layout_height, reference.layout_height);
            }
        }
        let dot = layout(&tree, ZoomTier::Dot);
        assert!(dot.nodes.values().all(|n| n.height == 10.0));
    }

    #[test]
    fn missing_estimate_falls_back_to_tier_box() {
        let (tree, ids) = build(&[(None, "not a number")]);
        let g = layout(&tree, ZoomTier::Full);
        let node = g.get(ids[0].as_str()).unwrap();
        assert_eq!(node.height, 500.0);
        assert_eq!(node.layout_height, 500.0);

        let nan = |_: &str, _: ZoomTier| Some(f32::NAN);
        let g = compute_layout(&tree, ZoomTier::Preview, &LayoutConfig::default(), &nan);
        let node = g.get(ids[0].as_str()).unwrap();
        assert_eq!((node.height, node.layout_height), (80.0, 500.0));
    }

    #[test]
    fn lower_tier_height_is_capped_at_layout_height() {
        let (tree, ids) = build(&[(None, "100"), (Some(0), "100")]);
        let tall_preview = |_: &str, tier: ZoomTier| match tier {
            ZoomTier::Full => Some(100.0),
            _ => Some(1000.0),
        };
        let g = compute_layout(&tree, ZoomTier::Preview, &LayoutConfig::default(), &tall_preview);
        let (parent, child) = (g.get(ids[0].as_str()).unwrap(), g.get(ids[1].as_str()).unwrap());

        assert_eq!(parent.height, 100.0);
        assert!(child.y >= parent.y + parent.height);
    }

    #[test]
    fn empty_tree_has_empty_layout() {
        let g = layout(&ConversationTree::new(), ZoomTier::Label);
        assert!(g.is_empty());
        assert!(g.edges.is_empty());
        assert_eq!(g.bounds(800.0), None);
    }

    #[test]
    fn edges_follow_pre_order() {
        let (tree, ids) = build(&[(None, "1"), (Some(0), "1"), (Some(1), "1"), (Some(0), "1")]);
        let g = layout(&tree, ZoomTier::Full);
        let pairs: Vec<(NodeId, NodeId)> = g
            .edges
            .iter()
            .map(|e| (e.source.clone(), e.target.clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (ids[0].clone(), ids[1].clone()),
                (ids[1].clone(), ids[2].clone()),
                (ids[0].clone(), ids[3].clone()),
            ]
        );
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let mut store = TreeStore::new();
        let mut parent = store.add_node(None, Role::User, "0", vec![]).unwrap();
        for _ in 0..20_000 {
            parent = store
                .add_node(Some(&parent), Role::Assistant, "0", vec![])
                .unwrap();
        }
        let g = layout(store.state().tree(), ZoomTier::Full);
        assert_eq!(g.len(), 20_001);
        assert_eq!(g.get(parent.as_str()).unwrap().y, 20_000.0 * 120.0);
        assert_eq!(g.get(parent.as_str()).unwrap().x, 0.0);
    }

    #[test]
    fn render_origin_offsets_half_width_only() {
        let node = NodeLayout {
            x: 500.0,
            y: 40.0,
            height: 80.0,
            layout_height: 300.0,
        };
        assert_eq!(node.render_origin(TierBox::new(400.0, 80.0)), (300.0, 40.0));
        assert_eq!(node.bottom(), 340.0);
    }

    #[test]
    fn bounds_cover_every_box() {
        let (tree, _) = build(&[(None, "100"), (Some(0), "100"), (Some(0), "100")]);
        let g = layout(&tree, ZoomTier::Full);
        let b = g.bounds(800.0).unwrap();
        assert_eq!(b.min_x, -400.0);
        assert_eq!(b.max_x, 860.0 + 400.0);
        assert_eq!(b.max_y, 220.0 + 100.0);
    }

    #[test]
    fn engine_reuses_layout_until_content_changes() {
        let mut store = TreeStore::new();
        let root = store.add_node(None, Role::User, "hello", vec![]).unwrap();
        let mut engine = LayoutEngine::new(
            LayoutConfig::default(),
            FixedTierHeight::new(Default::default()),
        );

        let first = engine.layout(store.state().tree(), ZoomTier::Full);
        let again = engine.layout(store.state().tree(), ZoomTier::Full);
        assert!(Arc::ptr_eq(&first, &again));

        store.set_status(&root, spectra_tree::NodeStatus::Streaming);
        let after_status = engine.layout(store.state().tree(), ZoomTier::Full);
        assert!(Arc::ptr_eq(&first, &after_status));

        store.update_content(&root, "hello there");
        let after_content = engine.layout(store.state().tree(), ZoomTier::Full);
        assert!(!Arc::ptr_eq(&first, &after_content));
        assert_eq!(*first, *after_content);
    }
}
