//! Graph store collaborator trait.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;

use crate::error::SquashResult;
use crate::types::{NodeId, RawEdge};

/// Which view of the graph a query runs against.
///
/// Decomposition peels nodes out of a *residual* view; assignment and
/// aggregation always read the *original*, unpeeled graph. Deletions issued
/// through [`GraphStore::delete_node`] only ever affect the residual view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphView {
    /// Original graph minus nodes peeled or promoted so far.
    Residual,
    /// The full graph as imported, unaffected by deletions.
    Original,
}

/// Abstraction over the backing graph storage engine.
///
/// Implementations may be an in-memory adjacency structure for small
/// graphs or a remote/paged store for graphs too large to hold in memory;
/// every method is a potential network round-trip and is therefore async
/// and fallible.
///
/// Determinism contract: `node_ids` and `neighbors` return ids in sorted
/// order, and `scan_edges` yields a stable, restartable ordering across
/// calls on an unchanged graph. The tie-break rules of the compression
/// algorithms depend on this.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Number of nodes in the given view.
    async fn node_count(&self, view: GraphView) -> SquashResult<usize>;

    /// Whether the given view has no nodes.
    async fn is_empty(&self, view: GraphView) -> SquashResult<bool> {
        Ok(self.node_count(view).await? == 0)
    }

    /// All node ids in the given view, sorted.
    async fn node_ids(&self, view: GraphView) -> SquashResult<Vec<NodeId>>;

    /// Residual degree of a node. Nodes removed from the residual view
    /// have degree 0.
    async fn degree(&self, node: &NodeId) -> SquashResult<usize>;

    /// Residual degrees for a batch of nodes, amortizing round-trips.
    async fn bulk_degree(&self, nodes: &[NodeId]) -> SquashResult<HashMap<NodeId, usize>>;

    /// Adjacent node ids in the given view, sorted.
    async fn neighbors(&self, node: &NodeId, view: GraphView) -> SquashResult<BTreeSet<NodeId>>;

    /// Remove a node and its incident edges from the residual view.
    ///
    /// Idempotent: deleting an already-removed node is a no-op. Never
    /// affects the original view used by assignment and aggregation.
    async fn delete_node(&self, node: &NodeId) -> SquashResult<()>;

    /// Restore the residual view to the full original graph, undoing all
    /// deletions. Used when a compression run starts over.
    async fn reset_residual(&self) -> SquashResult<()>;

    /// Fetch up to `limit` original edges starting at `offset`.
    ///
    /// The sequence is restartable: the same (offset, limit) against an
    /// unchanged graph returns the same batch. An empty batch means the
    /// scan is complete.
    async fn scan_edges(&self, offset: u64, limit: usize) -> SquashResult<Vec<RawEdge>>;
}
