//! Node, edge, and assignment types shared across the compression phases.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stable node identifier in the raw graph.
///
/// Kept as a plain string key so the store can map it onto whatever its
/// native identifier scheme is.
pub type NodeId = String;

/// A directed edge of the raw graph.
///
/// Direction is preserved for aggregation; decomposition and assignment
/// treat the graph as undirected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: NodeId,
    pub target: NodeId,
    /// Non-negative edge weight. Unweighted graphs use 1.0.
    pub weight: f64,
}

impl RawEdge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }

    /// Edge with the default weight of 1.0.
    pub fn unweighted(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self::new(source, target, 1.0)
    }
}

/// A representative node of the compressed graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreNode {
    /// Identifier of the underlying raw node promoted to CORE.
    pub id: NodeId,
    /// Number of raw nodes this CORE represents, including itself.
    /// Always >= 1.
    pub n_subnodes: usize,
}

/// A weighted edge between two CORE nodes of the compressed graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreEdge {
    pub source: NodeId,
    pub target: NodeId,
    /// Sum of the weights of the contributing raw edges.
    pub weight: f64,
    /// Count of distinct raw edges that contributed.
    pub n_distinct: usize,
    /// Derived strength measure, see [`crate::config::ScoreStrategy`].
    pub score: f64,
}

/// A single node-to-CORE claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// The owning CORE.
    pub core: NodeId,
    /// BFS hop distance at which the node was claimed. CORE nodes claim
    /// themselves at distance 0.
    pub distance: u32,
}

/// Total mapping from raw node id to its owning CORE.
///
/// Nodes absent from the map are unassigned. Once claimed, a node is never
/// reassigned for the remainder of the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    claims: BTreeMap<NodeId, Claim>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `node` for `core` at the given hop distance.
    ///
    /// Claims are first-wins: a node that already has an owner keeps it,
    /// and `false` is returned.
    pub fn claim(&mut self, node: NodeId, core: NodeId, distance: u32) -> bool {
        if self.claims.contains_key(&node) {
            return false;
        }
        self.claims.insert(node, Claim { core, distance });
        true
    }

    pub fn is_assigned(&self, node: &NodeId) -> bool {
        self.claims.contains_key(node)
    }

    pub fn core_of(&self, node: &NodeId) -> Option<&NodeId> {
        self.claims.get(node).map(|c| &c.core)
    }

    pub fn get(&self, node: &NodeId) -> Option<&Claim> {
        self.claims.get(node)
    }

    /// Number of assigned nodes, CORE nodes included.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Iterate claims in node-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Claim)> {
        self.claims.iter()
    }

    /// Count of represented nodes per CORE, including the CORE itself.
    pub fn subnode_counts(&self) -> BTreeMap<NodeId, usize> {
        let mut counts = BTreeMap::new();
        for claim in self.claims.values() {
            *counts.entry(claim.core.clone()).or_insert(0) += 1;
        }
        counts
    }
}
