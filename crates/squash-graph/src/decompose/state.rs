//! Serializable decomposition progress.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use squash_core::NodeId;

/// Progress of a decomposition run, persisted after each peel/promote
/// cycle so an interrupted run resumes without reprocessing prior peels.
///
/// The residual degree map is deliberately not serialized: the residual
/// view lives in the graph store, so after a restart the degrees are
/// re-derived from the store with one bulk query instead of being carried
/// in every checkpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecompositionState {
    /// CORE ids in promotion order.
    pub cores: Vec<NodeId>,
    /// Nodes with residual degree < k awaiting removal.
    pub frontier: BTreeSet<NodeId>,
    /// Count of nodes peeled so far (promoted cores not included).
    pub removed: u64,
    /// The residual graph ran out of nodes before `max_cores` was reached.
    pub exhausted: bool,
    /// Live residual degrees, rebuilt from the store on resume.
    #[serde(skip)]
    pub(crate) degrees: Option<BTreeMap<NodeId, usize>>,
}

impl DecompositionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of CORE nodes promoted so far.
    pub fn n_cores(&self) -> usize {
        self.cores.len()
    }
}
