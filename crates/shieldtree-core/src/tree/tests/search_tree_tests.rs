use crate::tree::{
    error::{ArenaError, TreeError},
    ids::{ActionId, ObservationId},
    node::ObservationNode,
    outcomes::{DenseObservations, ObservationTable, SparseObservations},
    search_tree::BeliefTree,
};

type DenseTree = BeliefTree<u32, (), DenseObservations>;

fn dense_tree(capacity: Option<usize>) -> DenseTree {
    BeliefTree::new(ObservationNode::new(2, 3, ()), 3, capacity).expect("root fits")
}

#[test]
fn children_are_reached_through_action_and_observation() {
    let mut tree = dense_tree(None);
    let root = tree.root_id();
    let mut node = tree.new_node(());
    node.belief_mut().add_particle(9);

    let child = tree
        .insert_child(root, ActionId::from(1), ObservationId::from(2), node)
        .expect("insert should succeed");

    assert_eq!(tree.node_count(), 2);
    assert_eq!(
        tree.child(root, ActionId::from(1), ObservationId::from(2))
            .expect("lookup should succeed"),
        Some(child)
    );
    assert_eq!(
        tree.child(root, ActionId::from(0), ObservationId::from(2))
            .expect("lookup should succeed"),
        None
    );
    let stored = tree.node(child).expect("child exists");
    assert_eq!(stored.belief().particles(), &[9]);
    assert_eq!(stored.num_actions(), 2);
}

#[test]
fn rejected_inserts_leave_the_tree_unchanged() {
    let mut tree = dense_tree(None);
    let root = tree.root_id();
    let first = tree
        .insert_child(root, ActionId::from(0), ObservationId::from(0), tree.new_node(()))
        .expect("insert should succeed");

    let duplicate = tree
        .insert_child(root, ActionId::from(0), ObservationId::from(0), tree.new_node(()))
        .expect_err("slot is taken");
    assert_eq!(
        duplicate,
        TreeError::ChildAlreadyPresent {
            node_id: root,
            action_id: ActionId::from(0),
            observation: ObservationId::from(0),
        }
    );

    let out_of_range = tree
        .insert_child(root, ActionId::from(0), ObservationId::from(7), tree.new_node(()))
        .expect_err("observation 7 is outside a table of 3");
    assert_eq!(
        out_of_range,
        TreeError::ObservationOutOfRange {
            observation: ObservationId::from(7),
            num_observations: 3,
        }
    );

    let missing_action = tree
        .insert_child(root, ActionId::from(5), ObservationId::from(0), tree.new_node(()))
        .expect_err("action 5 does not exist");
    assert_eq!(
        missing_action,
        TreeError::MissingAction {
            node_id: root,
            action_id: ActionId::from(5),
        }
    );

    assert_eq!(tree.node_count(), 2);
    assert!(tree.node(first).is_ok());
}

#[test]
fn reroot_frees_the_whole_old_tree() {
    let mut tree = dense_tree(None);
    let old_root = tree.root_id();
    let child = tree
        .insert_child(old_root, ActionId::from(0), ObservationId::from(1), tree.new_node(()))
        .expect("insert should succeed");
    let grandchild = tree
        .insert_child(child, ActionId::from(1), ObservationId::from(0), tree.new_node(()))
        .expect("insert should succeed");

    let new_root = tree.reroot(tree.new_node(())).expect("reroot should succeed");

    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.root_id(), new_root);
    assert_eq!(tree.slot_count(), 3);
    for stale in [old_root, child, grandchild] {
        assert_eq!(
            tree.node(stale).map(|_| ()),
            Err(TreeError::MissingNode { node_id: stale })
        );
    }
}

#[test]
fn node_capacity_is_enforced() {
    let mut tree = dense_tree(Some(2));
    let root = tree.root_id();
    tree.insert_child(root, ActionId::from(0), ObservationId::from(0), tree.new_node(()))
        .expect("second node fits");

    let err = tree
        .insert_child(root, ActionId::from(0), ObservationId::from(1), tree.new_node(()))
        .expect_err("third node exceeds the cap");
    assert_eq!(
        err,
        TreeError::Arena(ArenaError::CapacityExceeded { capacity: 2 })
    );
}

#[test]
fn sparse_tree_grows_under_large_observations() {
    let mut tree: BeliefTree<u32, (), SparseObservations> =
        BeliefTree::new(ObservationNode::new(1, 1 << 48, ()), 1 << 48, None)
            .expect("root fits");
    let root = tree.root_id();

    for raw in [0u64, 1 << 47, (1 << 48) - 1] {
        tree.insert_child(root, ActionId::from(0), ObservationId::from(raw), tree.new_node(()))
            .expect("sparse insert should succeed");
    }

    assert_eq!(tree.node_count(), 4);
    assert_eq!(
        tree.action(root, ActionId::from(0))
            .expect("action exists")
            .children()
            .len(),
        3
    );
}

#[test]
fn snapshot_respects_depth_and_serializes() {
    let mut tree = dense_tree(None);
    let root = tree.root_id();
    let child = tree
        .insert_child(root, ActionId::from(1), ObservationId::from(2), tree.new_node(()))
        .expect("insert should succeed");
    tree.insert_child(child, ActionId::from(0), ObservationId::from(0), tree.new_node(()))
        .expect("insert should succeed");
    tree.action_mut(root, ActionId::from(1))
        .expect("action exists")
        .value_mut()
        .add(4.0);

    let shallow = tree.snapshot(Some(1)).expect("snapshot should succeed");
    assert_eq!(shallow.node_count, 3);
    assert_eq!(shallow.nodes.len(), 2);
    assert!(shallow.nodes.iter().all(|node| node.depth <= 1));

    let root_snapshot = &shallow.nodes[0];
    assert_eq!(root_snapshot.actions[1].visits, 1);
    assert_eq!(root_snapshot.actions[1].children[0].observation, 2);

    let full = tree.snapshot(None).expect("snapshot should succeed");
    assert_eq!(full.nodes.len(), 3);

    let json = full.to_json().expect("snapshot should serialize");
    assert!(json.contains("\"schema_version\": 1"));
}
