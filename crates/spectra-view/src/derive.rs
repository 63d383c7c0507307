//! Render graph derivation.
//!
//! Combines a tree snapshot, its layout and the interaction sets into the
//! positioned, styled graph a rendering surface draws. Every function here is
//! total: ids that do not resolve are skipped, never reported.
//!
//! Rules:
//! - dimming happens only at the full tier while focus mode is on; a node or
//!   edge is dimmed iff it is neither on the active branch nor highlighted
//! - a tree edge is on the branch (highlighted) iff both endpoints are
//! - pruning edges never join the branch or highlight sets and draw beneath
//!   every tree edge

use crate::flags::{EdgeFlags, NodeFlags};
use crate::selection::Selection;
use crate::style::{EdgeStroke, ViewStyle};
use serde::{Deserialize, Serialize};
use spectra_layout::{LayoutGraph, TierTable, ZoomTier};
use spectra_tree::{truncate_chars, NodeId, NodeStatus, Role, TreeNode, TreeState};
use std::collections::{HashMap, HashSet};
use tracing::debug;

// =============================================================================
// RENDER TYPES
// =============================================================================

/// Render fidelity, one per zoom tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Dot,
    Label,
    Preview,
    Full,
}

impl From<ZoomTier> for NodeKind {
    fn from(tier: ZoomTier) -> Self {
        match tier {
            ZoomTier::Dot => NodeKind::Dot,
            ZoomTier::Label => NodeKind::Label,
            ZoomTier::Preview => NodeKind::Preview,
            ZoomTier::Full => NodeKind::Full,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub role: Role,
    pub status: NodeStatus,
    /// Top-left corner of the rendered box.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    /// Text for this fidelity; empty for dots.
    pub text: String,
    pub flags: NodeFlags,
    pub opacity: f32,
    pub z_index: i32,
}

impl RenderNode {
    pub fn is_on_active_branch(&self) -> bool {
        self.flags.contains(NodeFlags::ON_ACTIVE_BRANCH)
    }

    pub fn is_highlighted(&self) -> bool {
        self.flags.contains(NodeFlags::HIGHLIGHTED)
    }

    pub fn is_selected(&self) -> bool {
        self.flags.contains(NodeFlags::SELECTED)
    }

    pub fn is_dimmed(&self) -> bool {
        self.flags.contains(NodeFlags::DIMMED)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Parent to child.
    Tree,
    /// Summarized ancestor to the summary node.
    Pruning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub kind: EdgeKind,
    pub source: NodeId,
    pub target: NodeId,
    pub flags: EdgeFlags,
    pub stroke: EdgeStroke,
    pub opacity: f32,
    pub z_index: i32,
}

impl RenderEdge {
    pub fn tree_edge_id(source: &NodeId, target: &NodeId) -> String {
        format!("{source}-{target}")
    }

    pub fn pruning_edge_id(source: &NodeId, target: &NodeId) -> String {
        format!("prune:{source}-{target}")
    }

    pub fn is_on_active_branch(&self) -> bool {
        self.flags.contains(EdgeFlags::ON_ACTIVE_BRANCH)
    }

    pub fn is_highlighted(&self) -> bool {
        self.flags.contains(EdgeFlags::HIGHLIGHTED)
    }

    pub fn is_dimmed(&self) -> bool {
        self.flags.contains(EdgeFlags::DIMMED)
    }
}

/// Everything a rendering surface needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderGraph {
    pub tier: ZoomTier,
    pub focus_mode: bool,
    /// Root to focus.
    pub active_branch: Vec<NodeId>,
    pub highlighted: Vec<NodeId>,
    /// Sorted by id.
    pub nodes: Vec<RenderNode>,
    /// Pruning edges first, then tree edges in pre-order.
    pub edges: Vec<RenderEdge>,
}

impl RenderGraph {
    pub fn empty(tier: ZoomTier) -> Self {
        Self {
            tier,
            focus_mode: false,
            active_branch: Vec::new(),
            highlighted: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes
            .binary_search_by(|n| n.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.nodes[i])
    }

    pub fn edge(&self, id: &str) -> Option<&RenderEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Nodes in paint order, lowest z first. Ties keep id order.
    pub fn nodes_by_z(&self) -> Vec<&RenderNode> {
        let mut nodes: Vec<&RenderNode> = self.nodes.iter().collect();
        nodes.sort_by_key(|n| n.z_index);
        nodes
    }

    /// Edges in paint order, lowest z first.
    pub fn edges_by_z(&self) -> Vec<&RenderEdge> {
        let mut edges: Vec<&RenderEdge> = self.edges.iter().collect();
        edges.sort_by_key(|e| e.z_index);
        edges
    }
}

// =============================================================================
// DERIVATION
// =============================================================================

/// Derive the render graph for `layout`'s tier.
pub fn derive_view(
    state: &TreeState,
    layout: &LayoutGraph,
    tiers: &TierTable,
    style: &ViewStyle,
) -> RenderGraph {
    let selection = Selection::from_state(state);
    derive_with_selection(state, layout, tiers, style, &selection)
}

/// As [`derive_view`], with interaction sets resolved by the caller.
pub fn derive_with_selection(
    state: &TreeState,
    layout: &LayoutGraph,
    tiers: &TierTable,
    style: &ViewStyle,
    selection: &Selection,
) -> RenderGraph {
    let tier = layout.tier;
    let tree = state.tree();
    let dims = tiers.get(tier);
    let dimming = tier.is_full() && selection.focus_mode();

    let depths = depths(layout);

    let mut graph = RenderGraph::empty(tier);
    graph.focus_mode = selection.focus_mode();
    graph.active_branch = selection.active_branch().to_vec();
    graph.highlighted = selection.highlighted().to_vec();

    for (id, pos) in &layout.nodes {
        let Some(node) = tree.get(id.as_str()) else {
            continue;
        };

        let mut flags = NodeFlags::empty();
        flags.set(NodeFlags::ON_ACTIVE_BRANCH, selection.is_on_branch(id));
        flags.set(NodeFlags::HIGHLIGHTED, selection.is_highlighted(id));
        flags.set(NodeFlags::SELECTED, selection.is_selected(id));
        flags.set(
            NodeFlags::DIMMED,
            dimming && !selection.counts_as_on_branch(id) && !selection.is_highlighted(id),
        );

        let z_index = if flags.contains(NodeFlags::SELECTED) {
            style.z.selected_node
        } else if flags.is_emphasized() {
            style.z.emphasized_node
        } else {
            style.z.node
        };
        let opacity = if flags.contains(NodeFlags::DIMMED) {
            style.node_dimmed_opacity
        } else {
            style.node_opacity
        };

        let (x, y) = pos.render_origin(dims);
        graph.nodes.push(RenderNode {
            id: id.clone(),
            kind: tier.into(),
            role: node.role,
            status: node.status,
            x,
            y,
            width: dims.width,
            height: pos.height,
            depth: depths.get(id).copied().unwrap_or(0),
            text: fidelity_text(node, tier, style),
            flags,
            opacity,
            z_index,
        });
    }

    graph.edges = pruning_edges(state, layout, style, dimming);
    for edge in &layout.edges {
        if !tree.contains(edge.source.as_str()) || !tree.contains(edge.target.as_str()) {
            continue;
        }
        let (s, t) = (&edge.source, &edge.target);

        let mut flags = EdgeFlags::empty();
        flags.set(
            EdgeFlags::ON_ACTIVE_BRANCH,
            selection.is_on_branch(s) && selection.is_on_branch(t),
        );
        flags.set(
            EdgeFlags::HIGHLIGHTED,
            selection.is_highlighted(s) && selection.is_highlighted(t),
        );
        let counts_on_branch = selection.counts_as_on_branch(s) && selection.counts_as_on_branch(t);
        flags.set(
            EdgeFlags::DIMMED,
            dimming && !counts_on_branch && !flags.contains(EdgeFlags::HIGHLIGHTED),
        );

        let stroke = if flags.contains(EdgeFlags::ON_ACTIVE_BRANCH) {
            &style.active_edge
        } else if flags.contains(EdgeFlags::HIGHLIGHTED) {
            &style.highlighted_edge
        } else {
            &style.inactive_edge
        };

        graph.edges.push(RenderEdge {
            id: RenderEdge::tree_edge_id(s, t),
            kind: EdgeKind::Tree,
            source: s.clone(),
            target: t.clone(),
            flags,
            stroke: stroke.clone(),
            opacity: edge_opacity(flags, style),
            z_index: if flags.is_emphasized() {
                style.z.emphasized_edge
            } else {
                style.z.edge
            },
        });
    }

    debug!(
        tier = %tier,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        focus_mode = graph.focus_mode,
        "derived render graph"
    );
    graph
}

/// One dashed, animated edge from every existing summarized ancestor to the
/// summary node, in node id order.
pub fn pruning_edges(
    state: &TreeState,
    layout: &LayoutGraph,
    style: &ViewStyle,
    dimming: bool,
) -> Vec<RenderEdge> {
    let tree = state.tree();
    let mut edges = Vec::new();

    for target in layout.nodes.keys() {
        let Some(node) = tree.get(target.as_str()) else {
            continue;
        };
        let mut seen: HashSet<&NodeId> = HashSet::new();
        for source in &node.pruned_node_ids {
            if source == target
                || !layout.nodes.contains_key(source)
                || !tree.contains(source.as_str())
                || !seen.insert(source)
            {
                continue;
            }
            let mut flags = EdgeFlags::ANIMATED | EdgeFlags::DASHED;
            flags.set(EdgeFlags::DIMMED, dimming);
            edges.push(RenderEdge {
                id: RenderEdge::pruning_edge_id(source, target),
                kind: EdgeKind::Pruning,
                source: source.clone(),
                target: target.clone(),
                flags,
                stroke: style.pruning_edge.clone(),
                opacity: edge_opacity(flags, style),
                z_index: style.z.pruning_edge,
            });
        }
    }
    edges
}

fn edge_opacity(flags: EdgeFlags, style: &ViewStyle) -> f32 {
    if flags.contains(EdgeFlags::DIMMED) {
        style.edge_dimmed_opacity
    } else {
        style.edge_opacity
    }
}

/// Depth from layout edges, which arrive parent before child.
fn depths(layout: &LayoutGraph) -> HashMap<&NodeId, usize> {
    let mut depths: HashMap<&NodeId, usize> = HashMap::with_capacity(layout.len());
    for edge in &layout.edges {
        let parent = depths.get(&edge.source).copied().unwrap_or(0);
        depths.insert(&edge.target, parent + 1);
    }
    depths
}

/// Text shown at each fidelity: nothing for dots, label then content for
/// labels, summary then leading lines for previews, everything at full.
pub fn fidelity_text(node: &TreeNode, tier: ZoomTier, style: &ViewStyle) -> String {
    let limits = style.text;
    match tier {
        ZoomTier::Dot => String::new(),
        ZoomTier::Label => node.display_label(limits.label_chars),
        ZoomTier::Preview => match &node.summary {
            Some(summary) => summary.clone(),
            None => {
                let head: Vec<&str> = node.content.lines().take(limits.preview_lines).collect();
                let head = head.join("\n");
                let more = node.content.lines().count() > limits.preview_lines;
                let text = truncate_chars(&head, limits.preview_chars);
                if more && !text.ends_with("...") {
                    format!("{text}...")
                } else {
                    text
                }
            }
        },
        ZoomTier::Full => node.content.clone(),
    }
}
