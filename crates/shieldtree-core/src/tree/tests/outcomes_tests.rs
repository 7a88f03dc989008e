use crate::tree::{
    ids::{NodeId, ObservationId},
    outcomes::{DenseObservations, InsertRejected, ObservationTable, SparseObservations},
};

#[test]
fn dense_table_rejects_observations_outside_its_range() {
    let mut table = DenseObservations::new(4);
    let child = NodeId::new(1, 0);

    assert_eq!(
        table.insert(ObservationId::from(4), child),
        Err(InsertRejected::OutOfRange {
            num_observations: 4
        })
    );
    assert!(table.is_empty());
    assert!(table.child(ObservationId::from(4)).is_none());
}

#[test]
fn dense_table_refuses_to_overwrite_a_child() {
    let mut table = DenseObservations::new(3);
    table
        .insert(ObservationId::from(2), NodeId::new(5, 0))
        .expect("empty slot accepts a child");

    assert_eq!(
        table.insert(ObservationId::from(2), NodeId::new(6, 0)),
        Err(InsertRejected::Occupied)
    );
    assert_eq!(table.child(ObservationId::from(2)), Some(NodeId::new(5, 0)));
    assert_eq!(table.len(), 1);
    assert_eq!(
        table.entries(),
        vec![(ObservationId::from(2), NodeId::new(5, 0))]
    );
}

#[test]
fn sparse_table_accepts_huge_observation_ids() {
    let mut table = SparseObservations::new(1 << 48);
    let huge = ObservationId::from((1u64 << 48) - 1);
    let other = ObservationId::from(1u64 << 40);

    table
        .insert(huge, NodeId::new(1, 0))
        .expect("sparse tables have no range limit");
    table
        .insert(other, NodeId::new(2, 0))
        .expect("sparse tables have no range limit");

    assert_eq!(table.child(huge), Some(NodeId::new(1, 0)));
    assert_eq!(table.child(ObservationId::from(3)), None);
    assert_eq!(
        table.insert(huge, NodeId::new(3, 0)),
        Err(InsertRejected::Occupied)
    );
    // first-visit order
    assert_eq!(
        table.entries(),
        vec![(huge, NodeId::new(1, 0)), (other, NodeId::new(2, 0))]
    );
}
