//! Checkpoint schema and binary codec.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use squash_core::{CoreEdge, CoreNode, SquashConfig, SquashError, SquashResult};

use super::phase::Phase;
use crate::aggregate::AggregationState;
use crate::assign::AssignmentState;
use crate::decompose::DecompositionState;

/// The primary parameters a run is keyed by.
///
/// Stored alongside the progress so a checkpoint can never be resumed
/// under a different configuration than it was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    pub k: u32,
    pub max_cores: usize,
    pub max_hops: u32,
}

impl From<&SquashConfig> for RunParams {
    fn from(config: &SquashConfig) -> Self {
        Self {
            k: config.k,
            max_cores: config.max_cores,
            max_hops: config.max_hops,
        }
    }
}

/// Everything needed to resume a run: phase name, parameters, and each
/// phase's progress snapshot. Serialized with bincode into the
/// [`CheckpointStore`](squash_core::CheckpointStore) under the run id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquashCheckpoint {
    pub run_id: String,
    pub phase: Phase,
    pub params: RunParams,
    pub decomposition: DecompositionState,
    pub assignment: AssignmentState,
    pub aggregation: AggregationState,
    /// Populated only once the run reaches `COMPLETE`.
    pub core_nodes: Vec<CoreNode>,
    pub core_edges: Vec<CoreEdge>,
    pub updated_at: DateTime<Utc>,
}

impl SquashCheckpoint {
    pub fn new(config: &SquashConfig) -> Self {
        Self {
            run_id: config.run_id(),
            phase: Phase::NotStarted,
            params: RunParams::from(config),
            decomposition: DecompositionState::new(),
            assignment: AssignmentState::new(),
            aggregation: AggregationState::new(),
            core_nodes: Vec::new(),
            core_edges: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn encode(&self) -> SquashResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| SquashError::Checkpoint(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> SquashResult<Self> {
        bincode::deserialize(bytes).map_err(|e| SquashError::Checkpoint(e.to_string()))
    }

    /// Decomposition has produced its final CORE set.
    pub fn decomposition_done(&self) -> bool {
        self.decomposition.exhausted || self.decomposition.cores.len() >= self.params.max_cores
    }

    /// The phase to (re-)enter when driving this checkpoint forward.
    ///
    /// Derived from the progress snapshots rather than the stored phase
    /// name, so a checkpoint left in `FAILED` resumes the phase that was
    /// interrupted.
    pub fn resume_phase(&self) -> Phase {
        if self.phase == Phase::Complete {
            return Phase::Complete;
        }
        if !self.decomposition_done() {
            Phase::Decomposing
        } else if !self.assignment.done {
            Phase::Assigning
        } else if !self.aggregation.done {
            Phase::Aggregating
        } else {
            Phase::Complete
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let config = SquashConfig::new(2, 5, 3);
        let mut checkpoint = SquashCheckpoint::new(&config);
        checkpoint.phase = Phase::Decomposing;
        checkpoint.decomposition.cores.push("a".into());
        checkpoint.decomposition.removed = 3;
        checkpoint
            .aggregation
            .accum
            .entry(("a".into(), "b".into()))
            .or_default()
            .weight = 2.5;

        let bytes = checkpoint.encode().unwrap();
        let decoded = SquashCheckpoint::decode(&bytes).unwrap();
        assert_eq!(decoded.run_id, "squash-k2-c5-h3");
        assert_eq!(decoded.phase, Phase::Decomposing);
        assert_eq!(decoded.decomposition.cores, vec!["a".to_string()]);
        assert_eq!(decoded.decomposition.removed, 3);
        assert_eq!(
            decoded
                .aggregation
                .accum
                .get(&("a".to_string(), "b".to_string()))
                .map(|acc| acc.weight),
            Some(2.5)
        );
    }

    #[test]
    fn corrupt_bytes_are_a_checkpoint_error() {
        let err = SquashCheckpoint::decode(&[0xde, 0xad]).unwrap_err();
        assert!(matches!(err, SquashError::Checkpoint(_)));
    }

    #[test]
    fn failed_checkpoint_resumes_interrupted_phase() {
        let config = SquashConfig::new(2, 1, 2);
        let mut checkpoint = SquashCheckpoint::new(&config);
        assert_eq!(checkpoint.resume_phase(), Phase::Decomposing);

        checkpoint.decomposition.cores.push("a".into());
        checkpoint.phase = Phase::Failed;
        assert_eq!(checkpoint.resume_phase(), Phase::Assigning);

        checkpoint.assignment.done = true;
        assert_eq!(checkpoint.resume_phase(), Phase::Aggregating);

        checkpoint.aggregation.done = true;
        assert_eq!(checkpoint.resume_phase(), Phase::Complete);
    }
}
