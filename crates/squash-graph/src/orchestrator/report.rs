//! Run result summary.

use serde::{Deserialize, Serialize};

use super::phase::Phase;

/// How a `squash_graph` invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The run reached `COMPLETE`; the compressed lists are available.
    Completed,
    /// The run was cancelled between checkpoints; re-invoking resumes.
    Cancelled,
}

/// Metrics for one `squash_graph` invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquashReport {
    pub outcome: RunOutcome,
    pub run_id: String,
    /// Phase the invocation started in (`NOT_STARTED` for a fresh run).
    pub resumed_from: Phase,
    /// Phase the run is in now.
    pub phase: Phase,
    pub n_cores: usize,
    /// Nodes in the original graph.
    pub graph_size: usize,
    /// Nodes claimed by a CORE, the COREs themselves included.
    pub n_assigned: usize,
    /// Nodes not reached within `max_hops` of any CORE. Reported, never
    /// an error.
    pub n_unassigned: usize,
    /// `n_assigned / graph_size`, 0.0 for an empty graph.
    pub assignment_ratio: f64,
    pub n_core_edges: usize,
    pub edges_scanned: u64,
    pub edges_dropped_unassigned: u64,
    pub intra_group_edges: u64,
}
