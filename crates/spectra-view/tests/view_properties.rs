//! Property tests for view derivation over random trees and interaction state.

use proptest::prelude::*;
use spectra_layout::{compute_layout, FixedTierHeight, LayoutConfig, ZoomTier};
use spectra_tree::{NodeId, Role, TreeState, TreeStore};
use spectra_view::{derive_view, EdgeKind, RenderGraph, ViewStyle};
use std::collections::HashSet;

#[derive(Debug, Clone)]
struct Scenario {
    parents: Vec<usize>,
    focus: Option<usize>,
    highlights: Vec<usize>,
    tier: u8,
}

fn arb_scenario() -> impl Strategy<Value = Scenario> {
    (
        prop::collection::vec(any::<usize>(), 0..30),
        proptest::option::of(any::<usize>()),
        prop::collection::vec(any::<usize>(), 0..5),
        0u8..4,
    )
        .prop_map(|(parents, focus, highlights, tier)| Scenario {
            parents,
            focus,
            highlights,
            tier,
        })
}

fn build(s: &Scenario) -> (TreeState, Vec<NodeId>) {
    let mut store = TreeStore::new();
    let mut ids = vec![store.add_node(None, Role::User, "root", vec![]).unwrap()];
    for (i, parent) in s.parents.iter().enumerate() {
        let parent = ids[parent % (i + 1)].clone();
        ids.push(
            store
                .add_node(Some(&parent), Role::Assistant, format!("n{i}"), vec![])
                .unwrap(),
        );
    }
    store.clear_highlights();
    let focus = s.focus.map(|f| ids[f % ids.len()].clone());
    store.focus_node(focus.as_ref());
    for h in &s.highlights {
        let id = ids[h % ids.len()].clone();
        if !store.state().highlighted_node_ids().contains(&id) {
            store.toggle_highlight(&id);
        }
    }
    (store.state().clone(), ids)
}

fn render(state: &TreeState, tier: ZoomTier) -> RenderGraph {
    let config = LayoutConfig::default();
    let layout = compute_layout(state.tree(), tier, &config, &FixedTierHeight::new(config.tiers));
    derive_view(state, &layout, &config.tiers, &ViewStyle::default())
}

proptest! {
    #[test]
    fn dimming_follows_branch_and_highlight(s in arb_scenario()) {
        let (state, ids) = build(&s);
        let tier = ZoomTier::from_index(s.tier).unwrap();
        let g = render(&state, tier);

        let branch: HashSet<NodeId> = state.active_branch().into_iter().collect();
        let highlighted: HashSet<NodeId> = state.highlighted_node_ids().iter().cloned().collect();
        let focus_mode = state.focused_node_id().is_some();

        prop_assert_eq!(g.nodes.len(), ids.len());
        for node in &g.nodes {
            let expected = tier.is_full()
                && focus_mode
                && !branch.contains(&node.id)
                && !highlighted.contains(&node.id);
            prop_assert_eq!(node.is_dimmed(), expected);
            prop_assert_eq!(node.is_on_active_branch(), branch.contains(&node.id));
            prop_assert_eq!(node.is_highlighted(), highlighted.contains(&node.id));
        }
    }

    #[test]
    fn one_tree_edge_per_link(s in arb_scenario()) {
        let (state, ids) = build(&s);
        let g = render(&state, ZoomTier::Full);

        let tree_edges: Vec<_> = g.edges.iter().filter(|e| e.kind == EdgeKind::Tree).collect();
        prop_assert_eq!(tree_edges.len(), ids.len() - 1);
        let unique: HashSet<&str> = tree_edges.iter().map(|e| e.id.as_str()).collect();
        prop_assert_eq!(unique.len(), tree_edges.len());

        for edge in tree_edges {
            let both_on_branch = g.node(edge.source.as_str()).unwrap().is_on_active_branch()
                && g.node(edge.target.as_str()).unwrap().is_on_active_branch();
            prop_assert_eq!(edge.is_on_active_branch(), both_on_branch);
        }
    }

    #[test]
    fn emphasized_nodes_draw_above_the_rest(s in arb_scenario()) {
        let (state, _) = build(&s);
        let g = render(&state, ZoomTier::Full);
        let max_plain = g.nodes.iter()
            .filter(|n| !n.is_on_active_branch() && !n.is_highlighted())
            .map(|n| n.z_index)
            .max();
        let min_emphasized = g.nodes.iter()
            .filter(|n| n.is_on_active_branch() || n.is_highlighted())
            .map(|n| n.z_index)
            .min();
        if let (Some(plain), Some(emphasized)) = (max_plain, min_emphasized) {
            prop_assert!(emphasized > plain);
        }
    }

    #[test]
    fn derivation_is_deterministic(s in arb_scenario()) {
        let (state, _) = build(&s);
        let tier = ZoomTier::from_index(s.tier).unwrap();
        let a = serde_json::to_string(&render(&state, tier)).unwrap();
        let b = serde_json::to_string(&render(&state, tier)).unwrap();
        prop_assert_eq!(a, b);
    }
}
