//! Test-only collaborator stubs.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`: production
//! code cannot import these unless the `test-utils` feature is explicitly
//! enabled, which should never happen outside test builds.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{SquashError, SquashResult};
use crate::traits::{GraphStore, GraphView};
use crate::types::{NodeId, RawEdge};

/// Graph store that fails its next `fail_next` calls with a transient
/// error, then delegates to the wrapped store.
///
/// Used to exercise retry/backoff and `FAILED`-state escalation without a
/// real unreliable backend.
pub struct FlakyGraphStore {
    inner: Arc<dyn GraphStore>,
    fail_next: AtomicU32,
    calls: AtomicU32,
}

impl FlakyGraphStore {
    pub fn new(inner: Arc<dyn GraphStore>, fail_next: u32) -> Self {
        Self {
            inner,
            fail_next: AtomicU32::new(fail_next),
            calls: AtomicU32::new(0),
        }
    }

    /// Arm the stub to fail the next `n` calls.
    pub fn fail_next(&self, n: u32) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Total store calls observed, failures included.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, operation: &str) -> SquashResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.fail_next.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_next.store(remaining - 1, Ordering::SeqCst);
            return Err(SquashError::collaborator(operation, "injected failure"));
        }
        Ok(())
    }
}

/// Graph store that parks its first call until released.
///
/// Lets a test hold a compression run open mid-phase while asserting
/// what concurrent callers observe.
pub struct GatedGraphStore {
    inner: Arc<dyn GraphStore>,
    armed: AtomicBool,
    entered: Notify,
    release: Notify,
}

impl GatedGraphStore {
    pub fn new(inner: Arc<dyn GraphStore>) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(true),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Wait until a store call has parked at the gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the parked call proceed.
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn gate(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }
}

#[async_trait]
impl GraphStore for GatedGraphStore {
    async fn node_count(&self, view: GraphView) -> SquashResult<usize> {
        self.gate().await;
        self.inner.node_count(view).await
    }

    async fn node_ids(&self, view: GraphView) -> SquashResult<Vec<NodeId>> {
        self.gate().await;
        self.inner.node_ids(view).await
    }

    async fn degree(&self, node: &NodeId) -> SquashResult<usize> {
        self.gate().await;
        self.inner.degree(node).await
    }

    async fn bulk_degree(&self, nodes: &[NodeId]) -> SquashResult<HashMap<NodeId, usize>> {
        self.gate().await;
        self.inner.bulk_degree(nodes).await
    }

    async fn neighbors(&self, node: &NodeId, view: GraphView) -> SquashResult<BTreeSet<NodeId>> {
        self.gate().await;
        self.inner.neighbors(node, view).await
    }

    async fn delete_node(&self, node: &NodeId) -> SquashResult<()> {
        self.gate().await;
        self.inner.delete_node(node).await
    }

    async fn reset_residual(&self) -> SquashResult<()> {
        self.gate().await;
        self.inner.reset_residual().await
    }

    async fn scan_edges(&self, offset: u64, limit: usize) -> SquashResult<Vec<RawEdge>> {
        self.gate().await;
        self.inner.scan_edges(offset, limit).await
    }
}

#[async_trait]
impl GraphStore for FlakyGraphStore {
    async fn node_count(&self, view: GraphView) -> SquashResult<usize> {
        self.check("node_count")?;
        self.inner.node_count(view).await
    }

    async fn node_ids(&self, view: GraphView) -> SquashResult<Vec<NodeId>> {
        self.check("node_ids")?;
        self.inner.node_ids(view).await
    }

    async fn degree(&self, node: &NodeId) -> SquashResult<usize> {
        self.check("degree")?;
        self.inner.degree(node).await
    }

    async fn bulk_degree(&self, nodes: &[NodeId]) -> SquashResult<HashMap<NodeId, usize>> {
        self.check("bulk_degree")?;
        self.inner.bulk_degree(nodes).await
    }

    async fn neighbors(&self, node: &NodeId, view: GraphView) -> SquashResult<BTreeSet<NodeId>> {
        self.check("neighbors")?;
        self.inner.neighbors(node, view).await
    }

    async fn delete_node(&self, node: &NodeId) -> SquashResult<()> {
        self.check("delete_node")?;
        self.inner.delete_node(node).await
    }

    async fn reset_residual(&self) -> SquashResult<()> {
        self.check("reset_residual")?;
        self.inner.reset_residual().await
    }

    async fn scan_edges(&self, offset: u64, limit: usize) -> SquashResult<Vec<RawEdge>> {
        self.check("scan_edges")?;
        self.inner.scan_edges(offset, limit).await
    }
}
