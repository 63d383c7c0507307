//! Property tests for tree integrity under arbitrary mutation sequences.

use proptest::prelude::*;
use spectra_tree::{Changes, NodeId, NodeStatus, Role, TreeState, TreeStore, Validate};
use std::collections::HashSet;

/// Operations address existing nodes by index into the current id list, so
/// they stay meaningful no matter how the tree has evolved.
#[derive(Debug, Clone)]
enum Op {
    Add { parent: Option<usize>, text: String },
    Delete(usize),
    Update(usize, String),
    Status(usize, NodeStatus),
    Focus(Option<usize>),
    Toggle(usize),
    Branch(usize),
}

fn arb_status() -> impl Strategy<Value = NodeStatus> {
    prop_oneof![
        Just(NodeStatus::Idle),
        Just(NodeStatus::Streaming),
        Just(NodeStatus::Error),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (proptest::option::weighted(0.9, 0..64usize), "[a-z ]{0,12}")
            .prop_map(|(parent, text)| Op::Add { parent, text }),
        1 => (0..64usize).prop_map(Op::Delete),
        2 => (0..64usize, "[a-z ]{0,24}").prop_map(|(i, s)| Op::Update(i, s)),
        1 => (0..64usize, arb_status()).prop_map(|(i, s)| Op::Status(i, s)),
        1 => proptest::option::of(0..64usize).prop_map(Op::Focus),
        1 => (0..64usize).prop_map(Op::Toggle),
        1 => (0..64usize).prop_map(Op::Branch),
    ]
}

fn ids(state: &TreeState) -> Vec<NodeId> {
    state.tree().nodes().map(|n| n.id.clone()).collect()
}

fn pick(state: &TreeState, index: usize) -> Option<NodeId> {
    let ids = ids(state);
    (!ids.is_empty()).then(|| ids[index % ids.len()].clone())
}

fn apply(store: &mut TreeStore, op: &Op) {
    let state = store.snapshot();
    match op {
        Op::Add { parent, text } => {
            let parent = parent.and_then(|i| pick(&state, i));
            // Second-root attempts are expected to fail; the property is that
            // the tree stays valid either way.
            let _ = store.add_node(parent.as_ref(), Role::User, text.clone(), vec![]);
        }
        Op::Delete(i) => {
            if let Some(id) = pick(&state, *i) {
                store.delete_node(&id);
            }
        }
        Op::Update(i, text) => {
            if let Some(id) = pick(&state, *i) {
                store.update_content(&id, text);
            }
        }
        Op::Status(i, status) => {
            if let Some(id) = pick(&state, *i) {
                store.set_status(&id, *status);
            }
        }
        Op::Focus(i) => {
            let id = i.and_then(|i| pick(&state, i));
            store.focus_node(id.as_ref());
        }
        Op::Toggle(i) => {
            if let Some(id) = pick(&state, *i) {
                store.toggle_highlight(&id);
            }
        }
        Op::Branch(i) => {
            if let Some(id) = pick(&state, *i) {
                store.highlight_branch(&id);
            }
        }
    }
}

proptest! {
    #[test]
    fn any_op_sequence_keeps_a_valid_tree(ops in prop::collection::vec(arb_op(), 0..80)) {
        let mut store = TreeStore::new();
        for op in &ops {
            apply(&mut store, op);
            let state = store.snapshot();
            prop_assert!(state.validate().is_ok(), "invalid after {:?}: {:?}", op, state.validate());
        }
    }

    #[test]
    fn delete_removes_exactly_the_descendants(
        ops in prop::collection::vec(arb_op(), 1..60),
        target in 0..64usize,
    ) {
        let mut store = TreeStore::new();
        for op in &ops {
            apply(&mut store, op);
        }
        let before = store.snapshot();
        let Some(id) = pick(&before, target) else {
            return Ok(());
        };

        let expected: HashSet<NodeId> = before.tree().descendants(id.as_str()).into_iter().collect();
        let changes = store.delete_node(&id);
        prop_assert!(changes.contains(Changes::STRUCTURE));

        let after: HashSet<NodeId> = ids(&store.snapshot()).into_iter().collect();
        let all_before: HashSet<NodeId> = ids(&before).into_iter().collect();
        let removed: HashSet<NodeId> = all_before.difference(&after).cloned().collect();
        prop_assert_eq!(removed, expected);

        if before.tree().root_id() == Some(&id) {
            prop_assert!(store.snapshot().tree().is_empty());
        }
    }

    #[test]
    fn active_branch_runs_root_to_focus(
        ops in prop::collection::vec(arb_op(), 1..60),
        target in 0..64usize,
    ) {
        let mut store = TreeStore::new();
        for op in &ops {
            apply(&mut store, op);
        }
        let Some(id) = pick(&store.snapshot(), target) else {
            return Ok(());
        };
        store.focus_node(Some(&id));

        let state = store.snapshot();
        let branch = state.active_branch();
        let tree = state.tree();
        prop_assert_eq!(branch.first(), tree.root_id());
        prop_assert_eq!(branch.last(), Some(&id));
        prop_assert_eq!(Some(branch.len()), tree.depth(id.as_str()).map(|d| d + 1));
    }

    #[test]
    fn repeated_content_update_is_idempotent(text in "[a-z ]{0,40}") {
        let mut store = TreeStore::new();
        let root = store.add_node(None, Role::User, "", vec![]).unwrap();

        store.update_content(&root, &text);
        let first = store.snapshot();
        let revision = store.revision();

        prop_assert!(store.update_content(&root, &text).is_empty());
        prop_assert_eq!(&*store.snapshot(), &*first);
        prop_assert_eq!(store.revision(), revision);
    }
}

#[test]
fn chain_scenario_ancestor_path_and_cascade() {
    let mut store = TreeStore::new();
    let a = store.add_node(None, Role::User, "hi", vec![]).unwrap();
    let b = store
        .add_node(Some(&a), Role::Assistant, "hello", vec![])
        .unwrap();
    let c = store
        .add_node(Some(&b), Role::User, "tell me more", vec![])
        .unwrap();

    assert_eq!(
        store.state().tree().ancestor_path(c.as_str()),
        vec![a.clone(), b.clone(), c.clone()]
    );

    store.delete_node(&b);
    let state = store.snapshot();
    assert_eq!(state.node_count(), 1);
    assert!(state.tree().get(a.as_str()).unwrap().children.is_empty());
    assert!(!state.tree().contains(c.as_str()));
}
