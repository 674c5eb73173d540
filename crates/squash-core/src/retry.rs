//! Bounded-backoff retry wrapper for graph store round-trips.
//!
//! Transient collaborator failures are retried per call, so phase progress
//! is never lost to a blip: checkpoints stay at cycle/layer granularity
//! while individual queries absorb the flakiness.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::RetryPolicy;
use crate::error::{SquashError, SquashResult};
use crate::traits::{GraphStore, GraphView};
use crate::types::{NodeId, RawEdge};

/// [`GraphStore`] decorator that retries transient failures with
/// exponential backoff before escalating.
///
/// Only errors marked transient ([`SquashError::is_transient`]) are
/// retried; everything else propagates immediately. After the budget is
/// exhausted the error carries the total attempt count and the failing
/// operation name.
pub struct RetryingStore {
    inner: Arc<dyn GraphStore>,
    policy: RetryPolicy,
}

impl RetryingStore {
    pub fn new(inner: Arc<dyn GraphStore>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    async fn with_retry<T, F, Fut>(&self, operation: &str, mut call: F) -> SquashResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = SquashResult<T>>,
    {
        let mut attempt = 1u32;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient graph store failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(SquashError::CollaboratorUnavailable { message, .. }) => {
                    return Err(SquashError::CollaboratorUnavailable {
                        operation: operation.to_string(),
                        attempts: attempt,
                        message,
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[async_trait]
impl GraphStore for RetryingStore {
    async fn node_count(&self, view: GraphView) -> SquashResult<usize> {
        self.with_retry("node_count", || self.inner.node_count(view))
            .await
    }

    async fn is_empty(&self, view: GraphView) -> SquashResult<bool> {
        self.with_retry("is_empty", || self.inner.is_empty(view))
            .await
    }

    async fn node_ids(&self, view: GraphView) -> SquashResult<Vec<NodeId>> {
        self.with_retry("node_ids", || self.inner.node_ids(view))
            .await
    }

    async fn degree(&self, node: &NodeId) -> SquashResult<usize> {
        self.with_retry("degree", || self.inner.degree(node)).await
    }

    async fn bulk_degree(&self, nodes: &[NodeId]) -> SquashResult<HashMap<NodeId, usize>> {
        self.with_retry("bulk_degree", || self.inner.bulk_degree(nodes))
            .await
    }

    async fn neighbors(&self, node: &NodeId, view: GraphView) -> SquashResult<BTreeSet<NodeId>> {
        self.with_retry("neighbors", || self.inner.neighbors(node, view))
            .await
    }

    async fn delete_node(&self, node: &NodeId) -> SquashResult<()> {
        self.with_retry("delete_node", || self.inner.delete_node(node))
            .await
    }

    async fn reset_residual(&self) -> SquashResult<()> {
        self.with_retry("reset_residual", || self.inner.reset_residual())
            .await
    }

    async fn scan_edges(&self, offset: u64, limit: usize) -> SquashResult<Vec<RawEdge>> {
        self.with_retry("scan_edges", || self.inner.scan_edges(offset, limit))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryGraphStore;
    use crate::stubs::FlakyGraphStore;
    use crate::types::RawEdge;

    fn backing() -> Arc<InMemoryGraphStore> {
        Arc::new(InMemoryGraphStore::from_edges([RawEdge::unweighted(
            "a", "b",
        )]))
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay_ms: 1,
            max_delay_ms: 2,
        }
    }

    #[tokio::test]
    async fn recovers_from_transient_failures_within_budget() {
        let flaky = Arc::new(FlakyGraphStore::new(backing(), 2));
        let store = RetryingStore::new(flaky.clone(), fast_policy(4));

        let degree = store.degree(&"a".to_string()).await.unwrap();
        assert_eq!(degree, 1);
        // Two injected failures plus the successful attempt.
        assert_eq!(flaky.call_count(), 3);
    }

    #[tokio::test]
    async fn escalates_after_budget_exhaustion() {
        let flaky = Arc::new(FlakyGraphStore::new(backing(), 100));
        let store = RetryingStore::new(flaky, fast_policy(3));

        let err = store.degree(&"a".to_string()).await.unwrap_err();
        match err {
            SquashError::CollaboratorUnavailable {
                operation,
                attempts,
                ..
            } => {
                assert_eq!(operation, "degree");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected CollaboratorUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn passes_through_successful_calls() {
        let store = RetryingStore::new(backing(), fast_policy(4));
        assert!(!store.is_empty(GraphView::Original).await.unwrap());
        assert_eq!(store.scan_edges(0, 10).await.unwrap().len(), 1);
    }
}
