//! Serializable assignment progress.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use squash_core::{Assignment, NodeId};

/// Progress of the multi-source BFS, persisted after each CORE front
/// expansion so large graphs can be processed incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentState {
    /// Claims made so far; total over all reached nodes.
    pub assignment: Assignment,
    /// Hop distance of the layer currently being expanded.
    pub hop: u32,
    /// Per-CORE boundary: nodes claimed at `hop - 1`, the seeds for the
    /// current layer.
    pub fronts: BTreeMap<NodeId, BTreeSet<NodeId>>,
    /// COREs whose front has not yet been expanded in the current layer,
    /// processed in ascending id order.
    pub pending: BTreeSet<NodeId>,
    /// Boundaries being built for the next layer.
    pub next_fronts: BTreeMap<NodeId, BTreeSet<NodeId>>,
    /// Hop-0 self-claims have been made.
    pub initialized: bool,
    /// All fronts are exhausted or `max_hops` was reached.
    pub done: bool,
}

impl AssignmentState {
    pub fn new() -> Self {
        Self::default()
    }
}
