//! Serializable aggregation progress.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use squash_core::NodeId;

/// Running totals for one unordered CORE pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeAccumulator {
    /// Sum of contributing raw edge weights.
    pub weight: f64,
    /// Count of distinct contributing raw edges.
    pub n_distinct: usize,
}

/// Progress of the edge scan, persisted after each batch so aggregation
/// resumes mid-scan instead of rewalking the edge list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationState {
    /// Offset of the next edge batch to fetch.
    pub cursor: u64,
    /// Raw edges seen so far.
    pub scanned: u64,
    /// Edges dropped because an endpoint was unassigned.
    pub dropped_unassigned: u64,
    /// Edges whose endpoints resolved to the same CORE.
    pub intra_group: u64,
    /// Accumulators keyed by unordered CORE pair `(min, max)`; a folded
    /// self-loop uses `(core, core)`.
    pub accum: BTreeMap<(NodeId, NodeId), EdgeAccumulator>,
    /// The edge scan reached the end of the sequence.
    pub done: bool,
}

impl AggregationState {
    pub fn new() -> Self {
        Self::default()
    }
}
