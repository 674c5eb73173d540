//! Error types for graph compression operations.
//!
//! All fallible operations return [`SquashResult`]. Transient collaborator
//! failures are retried by [`crate::retry::RetryingStore`] before they
//! surface here as `CollaboratorUnavailable`.

use thiserror::Error;

/// Result type alias for compression operations.
pub type SquashResult<T> = Result<T, SquashError>;

/// Error taxonomy for a compression run.
///
/// Variants are ordered roughly by when they can occur: configuration is
/// rejected before any collaborator call, collaborator failures can happen
/// during any active phase, and accessor errors only after a run exists.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SquashError {
    /// Invalid run parameters, rejected before any collaborator call.
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    /// Graph store unreachable or a query failed, after exhausting the
    /// retry budget. The last persisted checkpoint remains intact.
    #[error("graph store unavailable during {operation} after {attempts} attempt(s): {message}")]
    CollaboratorUnavailable {
        operation: String,
        attempts: u32,
        message: String,
    },

    /// Decomposition was invoked on a graph with zero nodes.
    ///
    /// Reported, not fatal: the orchestrator completes the run with zero
    /// CORE nodes and empty edge lists.
    #[error("graph contains no nodes")]
    EmptyGraph,

    /// Accessor called before the run reached `COMPLETE`.
    #[error("compressed graph not ready: run is in phase {phase}")]
    NotReady { phase: String },

    /// Checkpoint could not be persisted, loaded, or decoded.
    #[error("checkpoint error: {0}")]
    Checkpoint(String),

    /// A second writer attempted to enter the checkpoint critical section
    /// while a run against the same graph was active.
    #[error("a compression run is already in progress for this graph")]
    RunInProgress,
}

impl SquashError {
    /// Build a `Configuration` error from anything displayable.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Build a single-attempt `CollaboratorUnavailable` error. Used by
    /// store implementations for individual failed round-trips; the retry
    /// wrapper re-wraps with the final attempt count.
    pub fn collaborator(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CollaboratorUnavailable {
            operation: operation.into(),
            attempts: 1,
            message: message.into(),
        }
    }

    /// True for failures worth retrying with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::CollaboratorUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_errors_are_transient() {
        let err = SquashError::collaborator("degree", "connection refused");
        assert!(err.is_transient());
        assert!(err.to_string().contains("degree"));
    }

    #[test]
    fn configuration_errors_are_not_transient() {
        let err = SquashError::configuration("k must be >= 1");
        assert!(!err.is_transient());
    }
}
