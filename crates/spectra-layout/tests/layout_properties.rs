//! Property tests for the vine layout over random trees.

use proptest::prelude::*;
use spectra_layout::{compute_layout, LayoutConfig, LayoutGraph, ParagraphEstimator, ZoomTier};
use spectra_tree::{ConversationTree, NodeId, Role, TreeStore};

/// Node `i > 0` hangs under node `parent % i`, so every sequence is a tree.
fn arb_tree() -> impl Strategy<Value = Vec<(usize, String)>> {
    prop::collection::vec((any::<usize>(), "[a-z \n#-]{0,300}"), 1..40)
}

fn build(shape: &[(usize, String)]) -> (ConversationTree, Vec<NodeId>) {
    let mut store = TreeStore::new();
    let mut ids: Vec<NodeId> = Vec::new();
    for (i, (parent, content)) in shape.iter().enumerate() {
        let parent = (i > 0).then(|| ids[parent % i].clone());
        let id = store
            .add_node(parent.as_ref(), Role::User, content.clone(), vec![])
            .unwrap();
        ids.push(id);
    }
    (store.state().tree().clone(), ids)
}

fn layout(tree: &ConversationTree, tier: ZoomTier) -> LayoutGraph {
    let config = LayoutConfig::default();
    let estimator = ParagraphEstimator::new(config.height.clone(), config.tiers);
    compute_layout(tree, tier, &config, &estimator)
}

proptest! {
    #[test]
    fn layout_is_deterministic(shape in arb_tree(), tier in 0u8..4) {
        let (tree, _) = build(&shape);
        let tier = ZoomTier::from_index(tier).unwrap();
        let a = serde_json::to_string(&layout(&tree, tier)).unwrap();
        let b = serde_json::to_string(&layout(&tree, tier)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn positions_do_not_move_with_zoom(shape in arb_tree()) {
        let (tree, ids) = build(&shape);
        let full = layout(&tree, ZoomTier::Full);
        prop_assert_eq!(full.len(), ids.len());

        for tier in ZoomTier::ALL {
            let g = layout(&tree, tier);
            for id in &ids {
                let (a, b) = (g.get(id.as_str()).unwrap(), full.get(id.as_str()).unwrap());
                prop_assert_eq!((a.x, a.y), (b.x, b.y));
            }
        }
    }

    #[test]
    fn parents_center_on_first_and_last_child(shape in arb_tree()) {
        let (tree, ids) = build(&shape);
        let g = layout(&tree, ZoomTier::Full);
        for id in &ids {
            let children = tree.children(id.as_str());
            if let (Some(first), Some(last)) = (children.first(), children.last()) {
                let expected = (g.get(first.as_str()).unwrap().x + g.get(last.as_str()).unwrap().x) / 2.0;
                prop_assert_eq!(g.get(id.as_str()).unwrap().x, expected);
            }
        }
    }

    #[test]
    fn children_start_below_parent(shape in arb_tree(), tier in 0u8..4) {
        let (tree, _) = build(&shape);
        let tier = ZoomTier::from_index(tier).unwrap();
        let g = layout(&tree, tier);
        for edge in &g.edges {
            let parent = g.get(edge.source.as_str()).unwrap();
            let child = g.get(edge.target.as_str()).unwrap();
            prop_assert!(child.y >= parent.y + parent.layout_height);
            prop_assert!(child.y >= parent.y + parent.height);
        }
    }

    #[test]
    fn one_edge_per_parent_child_pair(shape in arb_tree()) {
        let (tree, _) = build(&shape);
        let g = layout(&tree, ZoomTier::Preview);
        prop_assert_eq!(g.edges.len(), tree.len() - 1);
        for edge in &g.edges {
            let child = tree.get(edge.target.as_str()).unwrap();
            prop_assert_eq!(child.parent_id.as_ref(), Some(&edge.source));
        }
    }
}
