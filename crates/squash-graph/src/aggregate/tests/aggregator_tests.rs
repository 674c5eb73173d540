//! Edge scan and accumulation tests.

use std::sync::Arc;

use squash_core::{
    Assignment, InMemoryGraphStore, RawEdge, ScoreStrategy, SelfLoopPolicy,
};

use crate::aggregate::{AggregationState, EdgeAggregator};

/// Two core groups: {a, a1, a2} owned by "a" and {b, b1} owned by "b",
/// plus one unassigned node "u".
fn assignment() -> Assignment {
    let mut assignment = Assignment::new();
    assignment.claim("a".into(), "a".into(), 0);
    assignment.claim("a1".into(), "a".into(), 1);
    assignment.claim("a2".into(), "a".into(), 1);
    assignment.claim("b".into(), "b".into(), 0);
    assignment.claim("b1".into(), "b".into(), 1);
    assignment
}

fn store() -> Arc<InMemoryGraphStore> {
    Arc::new(InMemoryGraphStore::from_edges([
        // Inter-group, both directions of the same unordered pair.
        RawEdge::new("a1", "b1", 2.0),
        RawEdge::new("b", "a2", 3.0),
        // Intra-group.
        RawEdge::new("a", "a1", 5.0),
        // Unassigned endpoint.
        RawEdge::new("a1", "u", 7.0),
    ]))
}

fn aggregator(policy: SelfLoopPolicy, strategy: ScoreStrategy) -> EdgeAggregator {
    EdgeAggregator::new(store(), 64, policy, strategy)
}

#[tokio::test]
async fn inter_group_edges_accumulate_by_unordered_pair() {
    let aggregator = aggregator(SelfLoopPolicy::Discard, ScoreStrategy::DistinctWeighted);
    let mut state = AggregationState::new();
    let edges = aggregator.aggregate(&assignment(), &mut state).await.unwrap();

    assert_eq!(edges.len(), 1);
    let edge = &edges[0];
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("a", "b"));
    assert_eq!(edge.weight, 5.0);
    assert_eq!(edge.n_distinct, 2);
    assert_eq!(edge.score, 10.0);
}

#[tokio::test]
async fn unassigned_endpoints_drop_the_edge() {
    let aggregator = aggregator(SelfLoopPolicy::Discard, ScoreStrategy::default());
    let mut state = AggregationState::new();
    aggregator.aggregate(&assignment(), &mut state).await.unwrap();

    assert_eq!(state.dropped_unassigned, 1);
    assert_eq!(state.scanned, 4);
}

#[tokio::test]
async fn discard_policy_drops_intra_group_edges() {
    let aggregator = aggregator(SelfLoopPolicy::Discard, ScoreStrategy::default());
    let mut state = AggregationState::new();
    let edges = aggregator.aggregate(&assignment(), &mut state).await.unwrap();

    assert_eq!(state.intra_group, 1);
    assert!(edges.iter().all(|e| e.source != e.target));
}

#[tokio::test]
async fn fold_policy_keeps_intra_group_weight_as_self_loop() {
    let aggregator = aggregator(SelfLoopPolicy::Fold, ScoreStrategy::DistinctWeighted);
    let mut state = AggregationState::new();
    let edges = aggregator.aggregate(&assignment(), &mut state).await.unwrap();

    assert_eq!(edges.len(), 2);
    let self_loop = edges
        .iter()
        .find(|e| e.source == "a" && e.target == "a")
        .unwrap();
    assert_eq!(self_loop.weight, 5.0);
    assert_eq!(self_loop.n_distinct, 1);
}

#[tokio::test]
async fn aggregation_never_invents_weight() {
    let raw_total: f64 = 2.0 + 3.0 + 5.0 + 7.0;
    for policy in [SelfLoopPolicy::Discard, SelfLoopPolicy::Fold] {
        let aggregator = aggregator(policy, ScoreStrategy::default());
        let mut state = AggregationState::new();
        let edges = aggregator.aggregate(&assignment(), &mut state).await.unwrap();
        let core_total: f64 = edges.iter().map(|e| e.weight).sum();
        assert!(core_total <= raw_total);
    }
}

#[tokio::test]
async fn small_batches_scan_to_the_same_result() {
    let one_shot = aggregator(SelfLoopPolicy::Discard, ScoreStrategy::default());
    let mut expected = AggregationState::new();
    let expected_edges = one_shot.aggregate(&assignment(), &mut expected).await.unwrap();

    let batched = EdgeAggregator::new(
        store(),
        1,
        SelfLoopPolicy::Discard,
        ScoreStrategy::default(),
    );
    let mut state = AggregationState::new();
    let edges = batched.aggregate(&assignment(), &mut state).await.unwrap();

    assert_eq!(edges, expected_edges);
    assert_eq!(state.cursor, 4);
}

#[tokio::test]
async fn log_distinct_score_applied_at_finalize() {
    let aggregator = aggregator(SelfLoopPolicy::Discard, ScoreStrategy::LogDistinct);
    let mut state = AggregationState::new();
    let edges = aggregator.aggregate(&assignment(), &mut state).await.unwrap();

    let edge = &edges[0];
    let expected = 5.0 * (1.0 + (2.0f64).ln());
    assert!((edge.score - expected).abs() < 1e-9);
}
