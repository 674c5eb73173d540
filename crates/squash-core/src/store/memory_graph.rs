//! In-memory graph store backing.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::SquashResult;
use crate::traits::{GraphStore, GraphView};
use crate::types::{NodeId, RawEdge};

#[derive(Debug, Default)]
struct Inner {
    /// Undirected original adjacency. Self-loops are kept in `edges` but
    /// do not contribute to adjacency or degree.
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    /// Original directed edge list in insertion order; the stable scan
    /// sequence for aggregation.
    edges: Vec<RawEdge>,
    /// Residual-view deletions.
    removed: BTreeSet<NodeId>,
}

/// Adjacency-map implementation of [`GraphStore`].
///
/// The residual view is an overlay (`removed` set) on top of the immutable
/// original adjacency, so deletions issued during decomposition never
/// disturb the edge list consumed later by aggregation.
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    inner: RwLock<Inner>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an edge list. Endpoints are created implicitly.
    pub fn from_edges(edges: impl IntoIterator<Item = RawEdge>) -> Self {
        let store = Self::new();
        for edge in edges {
            store.add_edge(edge);
        }
        store
    }

    /// Add an isolated node if it does not already exist.
    pub fn add_node(&self, node: impl Into<NodeId>) {
        let node = node.into();
        self.inner.write().adjacency.entry(node).or_default();
    }

    /// Add a directed raw edge; adjacency is updated in both directions.
    pub fn add_edge(&self, edge: RawEdge) {
        let mut inner = self.inner.write();
        inner.adjacency.entry(edge.source.clone()).or_default();
        inner.adjacency.entry(edge.target.clone()).or_default();
        if edge.source != edge.target {
            if let Some(set) = inner.adjacency.get_mut(&edge.source) {
                set.insert(edge.target.clone());
            }
            if let Some(set) = inner.adjacency.get_mut(&edge.target) {
                set.insert(edge.source.clone());
            }
        }
        inner.edges.push(edge);
    }

    fn residual_neighbors(inner: &Inner, node: &NodeId) -> BTreeSet<NodeId> {
        if inner.removed.contains(node) {
            return BTreeSet::new();
        }
        inner
            .adjacency
            .get(node)
            .map(|set| {
                set.iter()
                    .filter(|n| !inner.removed.contains(*n))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn node_count(&self, view: GraphView) -> SquashResult<usize> {
        let inner = self.inner.read();
        Ok(match view {
            GraphView::Original => inner.adjacency.len(),
            GraphView::Residual => inner.adjacency.len() - inner.removed.len(),
        })
    }

    async fn node_ids(&self, view: GraphView) -> SquashResult<Vec<NodeId>> {
        let inner = self.inner.read();
        Ok(match view {
            GraphView::Original => inner.adjacency.keys().cloned().collect(),
            GraphView::Residual => inner
                .adjacency
                .keys()
                .filter(|n| !inner.removed.contains(*n))
                .cloned()
                .collect(),
        })
    }

    async fn degree(&self, node: &NodeId) -> SquashResult<usize> {
        let inner = self.inner.read();
        Ok(Self::residual_neighbors(&inner, node).len())
    }

    async fn bulk_degree(&self, nodes: &[NodeId]) -> SquashResult<HashMap<NodeId, usize>> {
        let inner = self.inner.read();
        Ok(nodes
            .iter()
            .map(|n| (n.clone(), Self::residual_neighbors(&inner, n).len()))
            .collect())
    }

    async fn neighbors(&self, node: &NodeId, view: GraphView) -> SquashResult<BTreeSet<NodeId>> {
        let inner = self.inner.read();
        Ok(match view {
            GraphView::Residual => Self::residual_neighbors(&inner, node),
            GraphView::Original => inner.adjacency.get(node).cloned().unwrap_or_default(),
        })
    }

    async fn delete_node(&self, node: &NodeId) -> SquashResult<()> {
        let mut inner = self.inner.write();
        if inner.adjacency.contains_key(node) {
            inner.removed.insert(node.clone());
        }
        Ok(())
    }

    async fn reset_residual(&self) -> SquashResult<()> {
        self.inner.write().removed.clear();
        Ok(())
    }

    async fn scan_edges(&self, offset: u64, limit: usize) -> SquashResult<Vec<RawEdge>> {
        let inner = self.inner.read();
        let start = (offset as usize).min(inner.edges.len());
        let end = start.saturating_add(limit).min(inner.edges.len());
        Ok(inner.edges[start..end].to_vec())
    }
}
