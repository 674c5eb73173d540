//! Run phase state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// States of a compression run.
///
/// Transitions are strictly forward: `NOT_STARTED → DECOMPOSING →
/// ASSIGNING → AGGREGATING → COMPLETE`. `FAILED` is absorbing and
/// reachable from any active state on an unrecoverable collaborator
/// error; the last persisted progress survives it, so a later invocation
/// resumes the interrupted phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    Decomposing,
    Assigning,
    Aggregating,
    Complete,
    Failed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "NOT_STARTED",
            Self::Decomposing => "DECOMPOSING",
            Self::Assigning => "ASSIGNING",
            Self::Aggregating => "AGGREGATING",
            Self::Complete => "COMPLETE",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}
