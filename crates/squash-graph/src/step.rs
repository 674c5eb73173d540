//! Incremental phase progress.

/// Result of driving one checkpointable unit of phase work.
///
/// A unit is one peel/promote cycle, one CORE front expansion, or one edge
/// batch. The orchestrator persists a checkpoint between units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// More work remains in this phase.
    Continue,
    /// The phase has finished.
    Done,
}
