//! Lockstep BFS assignment tests.

use std::sync::Arc;

use squash_core::{InMemoryGraphStore, NodeId, RawEdge};

use crate::assign::{AssignmentState, CoreAssigner};
use crate::step::StepOutcome;

fn node(id: &str) -> NodeId {
    id.to_string()
}

/// Triangle {a, b, c} plus pendants d-a, e-b, f-c.
fn triangle_with_pendants() -> Arc<InMemoryGraphStore> {
    Arc::new(InMemoryGraphStore::from_edges([
        RawEdge::unweighted("a", "b"),
        RawEdge::unweighted("b", "c"),
        RawEdge::unweighted("c", "a"),
        RawEdge::unweighted("d", "a"),
        RawEdge::unweighted("e", "b"),
        RawEdge::unweighted("f", "c"),
    ]))
}

/// Path a - m - c: one node equidistant from two cores.
fn contested_path() -> Arc<InMemoryGraphStore> {
    Arc::new(InMemoryGraphStore::from_edges([
        RawEdge::unweighted("a", "m"),
        RawEdge::unweighted("m", "c"),
    ]))
}

async fn run(
    store: Arc<InMemoryGraphStore>,
    cores: &[&str],
    max_hops: u32,
) -> AssignmentState {
    let assigner = CoreAssigner::new(store, max_hops);
    let cores: Vec<NodeId> = cores.iter().map(|c| c.to_string()).collect();
    let mut state = AssignmentState::new();
    assigner.assign(&cores, &mut state).await.unwrap();
    state
}

#[tokio::test]
async fn cores_claim_themselves_at_distance_zero() {
    let state = run(triangle_with_pendants(), &["a"], 2).await;
    let claim = state.assignment.get(&node("a")).unwrap();
    assert_eq!(claim.core, "a");
    assert_eq!(claim.distance, 0);
}

#[tokio::test]
async fn max_hops_zero_assigns_only_the_cores() {
    let state = run(triangle_with_pendants(), &["a", "b"], 0).await;
    assert_eq!(state.assignment.len(), 2);
    assert!(state.assignment.is_assigned(&node("a")));
    assert!(state.assignment.is_assigned(&node("b")));
    assert!(!state.assignment.is_assigned(&node("c")));
}

#[tokio::test]
async fn single_core_reaches_the_whole_graph_within_two_hops() {
    let state = run(triangle_with_pendants(), &["a"], 2).await;
    assert_eq!(state.assignment.len(), 6);

    // Claim distances follow BFS layers of the original graph.
    for (id, distance) in [("b", 1), ("c", 1), ("d", 1), ("e", 2), ("f", 2)] {
        let claim = state.assignment.get(&node(id)).unwrap();
        assert_eq!(claim.core, "a", "{id} should belong to a");
        assert_eq!(claim.distance, distance, "distance of {id}");
    }
}

#[tokio::test]
async fn nodes_outside_max_hops_stay_unassigned() {
    let store = Arc::new(InMemoryGraphStore::from_edges([
        RawEdge::unweighted("a", "b"),
        RawEdge::unweighted("b", "c"),
        RawEdge::unweighted("c", "d"),
        RawEdge::unweighted("d", "e"),
    ]));
    let state = run(store, &["a"], 2).await;

    assert_eq!(state.assignment.len(), 3);
    assert!(!state.assignment.is_assigned(&node("d")));
    assert!(!state.assignment.is_assigned(&node("e")));
}

#[tokio::test]
async fn equidistant_claims_go_to_the_smallest_core_id() {
    let state = run(contested_path(), &["a", "c"], 1).await;
    let claim = state.assignment.get(&node("m")).unwrap();
    assert_eq!(claim.core, "a");
    assert_eq!(claim.distance, 1);
}

#[tokio::test]
async fn cores_are_never_reassigned() {
    // "a" and "b" are adjacent cores; each keeps itself.
    let state = run(triangle_with_pendants(), &["a", "b"], 3).await;
    assert_eq!(state.assignment.get(&node("a")).unwrap().core, "a");
    assert_eq!(state.assignment.get(&node("b")).unwrap().core, "b");
    assert_eq!(state.assignment.get(&node("a")).unwrap().distance, 0);
}

#[tokio::test]
async fn cross_component_nodes_stay_unassigned_at_any_hop_count() {
    let store = Arc::new(InMemoryGraphStore::from_edges([
        RawEdge::unweighted("a", "b"),
        RawEdge::unweighted("x", "y"),
    ]));
    let state = run(store, &["a"], 100).await;

    assert!(state.assignment.is_assigned(&node("b")));
    assert!(!state.assignment.is_assigned(&node("x")));
    assert!(!state.assignment.is_assigned(&node("y")));
}

#[tokio::test]
async fn claims_partition_reached_nodes() {
    // Every assigned node has exactly one owner; assignment never
    // overlaps and cores own themselves.
    let state = run(triangle_with_pendants(), &["a", "c"], 2).await;
    for (id, claim) in state.assignment.iter() {
        assert!(claim.core == "a" || claim.core == "c", "owner of {id}");
        assert!(claim.distance <= 2);
    }
    assert_eq!(state.assignment.len(), 6);
}

#[tokio::test]
async fn interrupted_assignment_resumes_identically() {
    let baseline = run(triangle_with_pendants(), &["a", "c"], 2).await;

    let store = triangle_with_pendants();
    let cores = vec![node("a"), node("c")];
    let mut state = AssignmentState::new();
    {
        let assigner = CoreAssigner::new(store.clone(), 2);
        assigner.initialize(&cores, &mut state);
    }
    loop {
        // Fresh assigner over a round-tripped state each step, as a
        // restarted process would see it.
        let bytes = bincode::serialize(&state).unwrap();
        state = bincode::deserialize(&bytes).unwrap();
        let assigner = CoreAssigner::new(store.clone(), 2);
        if assigner.step(&mut state).await.unwrap() == StepOutcome::Done {
            break;
        }
    }
    assert_eq!(state.assignment, baseline.assignment);
}
