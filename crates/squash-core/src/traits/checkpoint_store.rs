//! Checkpoint persistence collaborator trait.

use async_trait::async_trait;

use crate::error::SquashResult;

/// Durable storage for phase-progress checkpoints.
///
/// Checkpoints are opaque byte blobs keyed by run id; encoding is owned by
/// the orchestrator so a storage backend never depends on the checkpoint
/// schema. Implementations must make `save` atomic per key: a reader never
/// observes a torn write.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Load the checkpoint for a run, if one was ever saved.
    async fn load(&self, run_id: &str) -> SquashResult<Option<Vec<u8>>>;

    /// Persist (overwrite) the checkpoint for a run.
    async fn save(&self, run_id: &str, bytes: &[u8]) -> SquashResult<()>;

    /// Remove a run's checkpoint. Removing a missing key is a no-op.
    async fn delete(&self, run_id: &str) -> SquashResult<()>;

    /// Ids of all runs with a stored checkpoint, sorted.
    async fn list_runs(&self) -> SquashResult<Vec<String>>;
}
